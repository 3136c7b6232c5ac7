//! Default catalog used when nothing has been stored yet.

use topup_core::{
    Banner, BannerId, Category, CategoryId, Price, Product, ProductId, ProductKind, StoreSettings,
};

fn product(
    id: &str,
    name: &str,
    amount: u32,
    price: i64,
    kind: ProductKind,
    parent: Option<&str>,
) -> Product {
    Product {
        id: ProductId::new(id),
        name: name.to_string(),
        amount,
        price: Price::from_taka(price),
        image: None,
        kind,
        parent_category: parent.map(CategoryId::from),
    }
}

/// Diamond packs and memberships.
#[must_use]
pub fn products() -> Vec<Product> {
    use ProductKind::{Diamonds, Membership};

    vec![
        product("ff-25", "25 Diamonds", 25, 20, Diamonds, None),
        product("ff-50", "50 Diamonds", 50, 35, Diamonds, None),
        product("ff-100", "100 Diamonds", 100, 70, Diamonds, None),
        product("ff-115", "115 Diamonds", 115, 76, Diamonds, None),
        product("ff-200", "200 Diamonds", 200, 140, Diamonds, None),
        product("ff-505", "505 Diamonds", 505, 325, Diamonds, None),
        product("ff-10120", "10120 Diamonds", 10120, 6080, Diamonds, None),
        product("evo-3d", "3 Days", 1, 65, Membership, Some("ff-evo")),
        product("evo-7d", "7 Days", 1, 95, Membership, Some("ff-evo")),
        product("evo-30d", "30 Days", 1, 285, Membership, Some("ff-evo")),
        product("weekly-mem", "Weekly Membership", 1, 153, Membership, Some("ff-weekly")),
        product("monthly-mem", "Monthly Membership", 1, 760, Membership, None),
        product("lvl-6", "Level Up - 6 Level", 1, 35, Membership, Some("ff-lvlup")),
        product("lvl-all", "Level Up All Package", 1, 360, Membership, Some("ff-lvlup")),
    ]
}

/// Storefront categories. These are fixed and not editable at runtime.
#[must_use]
pub fn categories() -> Vec<Category> {
    const FREE_FIRE_IMAGE: &str =
        "https://media.discordapp.net/attachments/1090433299447435345/1155160877864996914/Free_Fire.jpg";
    const WEEKLY_IMAGE: &str =
        "https://media.discordapp.net/attachments/1090433299447435345/1155160878179557457/Weekly.jpg";
    const LEVEL_UP_IMAGE: &str =
        "https://media.discordapp.net/attachments/1090433299447435345/1155160878431223908/LevelUp.jpg";

    vec![
        Category {
            id: CategoryId::new("ff-bd"),
            name: "Free Fire Diamond Top Up BD".into(),
            image: FREE_FIRE_IMAGE.into(),
            price_range: "৳ 20 – ৳ 7,600".into(),
            description: Some("Free Fire Diamond Top Up Bangladesh Server only.".into()),
            bn_description: None,
            includes_kind: Some(ProductKind::Diamonds),
        },
        Category {
            id: CategoryId::new("ff-evo"),
            name: "Free Fire Evo Access BD".into(),
            image: WEEKLY_IMAGE.into(),
            price_range: "৳ 65 – ৳ 285".into(),
            description: Some(
                "Free Fire Evo Access Pass buy in Bangladesh using bKash, Nagad, and Rocket."
                    .into(),
            ),
            bn_description: Some(
                "ফ্রি ফায়ার ইভো এক্সেস শুধুমাত্র মাত্র বাংলাদেশ সার্ভার এর জন্য".into(),
            ),
            includes_kind: None,
        },
        Category {
            id: CategoryId::new("ff-weekly"),
            name: "Free Fire Weekly Membership BD".into(),
            image: WEEKLY_IMAGE.into(),
            price_range: "৳ 38 – ৳ 153".into(),
            description: None,
            bn_description: None,
            includes_kind: None,
        },
        Category {
            id: CategoryId::new("ff-lvlup"),
            name: "Free Fire Level Up Pass BD".into(),
            image: LEVEL_UP_IMAGE.into(),
            price_range: "৳ 35 – ৳ 360".into(),
            description: None,
            bn_description: None,
            includes_kind: None,
        },
    ]
}

/// Store settings before the administrator edits them.
#[must_use]
pub fn settings() -> StoreSettings {
    StoreSettings {
        notice_marquee: "সার্ভিস চালু: সকাল ৮ টা থেকে রাত ১১ টা পর্যন্ত। যে কোনো সমস্যায় হোয়াটসঅ্যাপে যোগাযোগ করুন।".into(),
        is_store_open: true,
        support_whatsapp: "8801401788594".into(),
    }
}

/// Home-page banners.
#[must_use]
pub fn banners() -> Vec<Banner> {
    vec![Banner {
        id: BannerId::new("b1"),
        image_url: "https://media.discordapp.net/attachments/1090433299447435345/1155160877864996914/Free_Fire.jpg".into(),
        link: None,
    }]
}

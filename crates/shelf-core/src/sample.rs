//! Static sample catalog served when the catalog source is unavailable.

use crate::asset::CoverOrigin;
use crate::category::Category;
use crate::product::Product;

struct SampleRow {
    name: &'static str,
    brand: &'static str,
    category: Category,
    price: f64,
    note: &'static str,
    photo: &'static str,
    day: u32,
}

const SAMPLE_ROWS: &[SampleRow] = &[
    SampleRow {
        name: "Mechanical Keyboard - TactX Pro",
        brand: "Nomatiq",
        category: Category::Tech,
        price: 159.99,
        note: "Hot-swappable switches. RGB backlight. Tactical feedback for command input.",
        photo: "photo-1587829741301-dc798b83add3",
        day: 15,
    },
    SampleRow {
        name: "Ultrawide Monitor 34\" QHD",
        brand: "Apple",
        category: Category::Workspace,
        price: 599.0,
        note: "Command center display. 144Hz refresh. Perfect for tactical overviews.",
        photo: "photo-1527443224154-c4a3942d3acf",
        day: 14,
    },
    SampleRow {
        name: "Ergonomic Task Chair",
        brand: "Secret Lab",
        category: Category::Workspace,
        price: 1299.0,
        note: "Mission-critical seating. Full lumbar support for extended operations.",
        photo: "photo-1580480055273-228ff5388ef8",
        day: 13,
    },
    SampleRow {
        name: "Wireless Headset - Stealth Edition",
        brand: "Sharge",
        category: Category::Tech,
        price: 179.99,
        note: "Noise cancellation. 7.1 surround. Crystal-clear comms.",
        photo: "photo-1546435770-a3e426bf472b",
        day: 12,
    },
    SampleRow {
        name: "Smart Coffee Maker",
        brand: "Ikea",
        category: Category::Home,
        price: 299.0,
        note: "Fuel station. Programmable brew cycles. Essential for night ops.",
        photo: "photo-1517668808822-9ebb02f2a0e6",
        day: 11,
    },
    SampleRow {
        name: "Standing Desk Frame",
        brand: "Floyd",
        category: Category::Workspace,
        price: 599.0,
        note: "Height adjustable. Memory presets. Tactical positioning system.",
        photo: "photo-1595515106969-1ce29566ff1c",
        day: 10,
    },
    SampleRow {
        name: "Precision Mouse - Viper Ultimate",
        brand: "Xiaomi",
        category: Category::Tech,
        price: 149.99,
        note: "Wireless. 20K DPI sensor. Zero latency. Surgical precision.",
        photo: "photo-1527814050087-3793815479db",
        day: 9,
    },
    SampleRow {
        name: "Robotic Vacuum Unit",
        brand: "Xiaomi",
        category: Category::Home,
        price: 449.0,
        note: "Autonomous cleaning protocol. LiDAR navigation. Base maintenance.",
        photo: "photo-1558317374-067fb5f30001",
        day: 8,
    },
    SampleRow {
        name: "Gaming Graphics Card RTX 4080",
        brand: "Apple",
        category: Category::Wishlist,
        price: 1199.0,
        note: "TARGET ACQUIRED. Next-gen ray tracing. Mission-critical upgrade.",
        photo: "photo-1591488320449-011701bb6704",
        day: 7,
    },
    SampleRow {
        name: "Automatic Cat Feeder",
        brand: "Xiaomi",
        category: Category::Pet,
        price: 89.99,
        note: "Scheduled deployment. Companion support system. Voice recording.",
        photo: "photo-1511694009171-3cdddf4484ff",
        day: 6,
    },
    SampleRow {
        name: "USB-C Hub - 12-in-1",
        brand: "Anker",
        category: Category::Tech,
        price: 79.99,
        note: "Central connectivity node. All port types. Mission adapter.",
        photo: "photo-1625948515291-69613efd103f",
        day: 5,
    },
    SampleRow {
        name: "Desk Lamp - LED Pro",
        brand: "Ikea",
        category: Category::Workspace,
        price: 129.0,
        note: "Auto-dimming. Eye-care technology. Illumination protocol.",
        photo: "photo-1507473885765-e6ed057f782c",
        day: 4,
    },
];

/// The deterministic fallback catalog, newest first.
pub fn sample_catalog() -> Vec<Product> {
    SAMPLE_ROWS
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let date = format!("2024-01-{:02}", row.day);
            let created = format!("{}T10:00:00.000Z", date);
            Product::new(format!("sample-{}", i + 1), row.name)
                .with_brand(Some(row.brand))
                .with_category(row.category)
                .with_price(row.price)
                .with_note(row.note)
                .with_url(Some("https://example.com".to_string()))
                .with_cover(
                    format!("https://images.unsplash.com/{}?w=800", row.photo),
                    CoverOrigin::Missing,
                )
                .with_dates(date, created)
        })
        .collect()
}

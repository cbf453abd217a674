//! The fixed demo graph: three publishers with three books each, three shops,
//! five stock lines and five sales.

use chrono::NaiveDate;

use super::SeedBatch;

const PUBLISHERS: &[(&str, [&str; 3])] = &[
    ("А.С. Пушкин", ["Капитанская дочка", "Руслан и Людмила", "Евгений Онегин"]),
    ("С.А. Есенин", ["Письмо матери", "Береза", "Сборник стихов С.А. Есенина"]),
    ("Л.Н. Толстой", ["Война и мир", "Анна Каренина", "Детство"]),
];

const SHOPS: &[&str] = &["Буквоед", "Лабиринт", "Книжный дом"];

/// (book index, shop index, count)
const STOCK: &[(usize, usize, i64)] = &[
    (0, 0, 10), // Капитанская дочка @ Буквоед
    (3, 0, 15), // Письмо матери @ Буквоед
    (0, 1, 8),  // Капитанская дочка @ Лабиринт
    (6, 1, 11), // Война и мир @ Лабиринт
    (7, 2, 6),  // Анна Каренина @ Книжный дом
];

/// (price, (year, month, day), stock index, count)
const SALES: &[(f64, (i32, u32, u32), usize, i64)] = &[
    (600.0, (2022, 11, 9), 0, 1),
    (500.0, (2022, 11, 8), 1, 1),
    (580.0, (2022, 11, 5), 2, 1),
    (490.0, (2022, 11, 2), 3, 1),
    (600.0, (2022, 10, 26), 4, 1),
];

/// Build the demo graph as a batch with in-batch cross-references.
pub fn demo_batch() -> SeedBatch {
    let mut batch = SeedBatch::new();

    let mut books = Vec::with_capacity(PUBLISHERS.len() * 3);
    for (name, titles) in PUBLISHERS {
        let publisher = batch.add_publisher(*name);
        for title in titles {
            books.push(batch.add_book(*title, Some(publisher)));
        }
    }

    let shops: Vec<_> = SHOPS.iter().map(|name| batch.add_shop(*name)).collect();

    let stock: Vec<_> = STOCK
        .iter()
        .map(|&(book, shop, count)| batch.add_stock(books[book], shops[shop], count))
        .collect();

    for &(price, (y, m, d), line, count) in SALES {
        // Literal dates above are all valid
        if let Some(date) = NaiveDate::from_ymd_opt(y, m, d) {
            batch.add_sale(price, date, stock[line], count);
        }
    }

    batch
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ModelKind;

    #[test]
    fn test_demo_batch_shape() {
        let batch = demo_batch();
        let count = |kind: ModelKind| batch.entries().iter().filter(|e| e.kind() == kind).count();

        assert_eq!(count(ModelKind::Publisher), 3);
        assert_eq!(count(ModelKind::Book), 9);
        assert_eq!(count(ModelKind::Shop), 3);
        assert_eq!(count(ModelKind::Stock), 5);
        assert_eq!(count(ModelKind::Sale), 5);
    }
}

// Integration tests for vmatch
use std::sync::Arc;
use vmatch::prelude::*;
use vmatch::CatalogLoader;

fn create_catalog() -> Catalog {
    Catalog::new(vec![
        Product::new(1, "electronics").with_name("Headphones"),
        Product::new(2, "fashion").with_name("Sneakers"),
    ])
    .unwrap()
}

#[test]
fn test_end_to_end_scenario() {
    let catalog = create_catalog();
    let upload = UploadInfo {
        filename: Some("headphone-photo.jpg".to_string()),
        mime_type: Some("image/jpeg".to_string()),
        size: 2048,
    };
    let key = QueryKey::derive(Some(&upload), None).unwrap();
    let scorer = Scorer::default();

    // Electronics gets the headphone bonus, fashion does not
    assert_eq!(scorer.bias("headphone-photo.jpg", &Category::Electronics), 20.0);
    assert_eq!(scorer.bias("headphone-photo.jpg", &Category::Fashion), 0.0);

    let ranked = catalog.rank(&scorer, key.as_str());
    assert_eq!(ranked.len(), 2);
    assert!(ranked[0].score >= ranked[1].score);
    assert_eq!(
        ranked.iter().map(|r| r.score).collect::<Vec<_>>(),
        vec![83, 70]
    );

    let filtered = filter(&ranked, 60, "all");
    assert_eq!(filtered.len(), 2);
    assert!(filtered.iter().all(|r| r.score >= 60));

    let strict = filter(&ranked, 80, "all");
    assert_eq!(strict.len(), 1);
    assert_eq!(strict[0].product.id, ProductId::from(2u64));
}

#[test]
fn test_empty_catalog_scenario() {
    let ranked = rank("anything", &[]);
    assert!(ranked.is_empty());
    assert!(filter(&ranked, 50, "electronics").is_empty());
}

#[test]
fn test_unknown_category_scenario() {
    let toys = Category::from("toys");
    let scorer = Scorer::default();
    for key in ["headphone", "shoe", "lamp", "sport", "headphone-shoe-lamp-sport"] {
        assert_eq!(scorer.bias(key, &toys), 0.0);
        assert_eq!(scorer.score_with_hash(key, &toys, 0), 50);
    }
}

#[test]
fn test_filter_reuses_scores() {
    let products: Vec<Product> = (0..50u64)
        .map(|i| Product::new(i, if i % 2 == 0 { "home" } else { "sports" }))
        .collect();
    let ranked = rank("https://example.com/lamp.png", &products);

    let loose = filter(&ranked, 55, "all");
    let tight = filter(&ranked, 75, "all");
    let narrowed = filter(&loose, 75, "all");
    assert_eq!(tight, narrowed);
    assert!(tight.len() <= loose.len());
}

#[test]
fn test_catalog_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("product.json");
    std::fs::write(
        &path,
        serde_json::to_vec(&serde_json::json!([
            {"id": 1, "category": "electronics", "name": "Headphones", "price": 99.0, "image": "h.jpg"},
            {"id": 2, "category": "fashion", "name": "Sneakers", "price": 59.0, "image": "s.jpg", "color": "red"}
        ]))
        .unwrap(),
    )
    .unwrap();

    let catalog = CatalogLoader::new(&path).load().unwrap();
    let ranked = rank("headphone-photo.jpg", catalog.products());
    let value = serde_json::to_value(&ranked).unwrap();
    assert_eq!(value[0]["color"], "red");
    assert_eq!(value[0]["similarity"], 83);
    assert_eq!(value[1]["similarity"], 70);
}

#[test]
fn test_concurrent_ranking_during_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("product.json");
    let write = |n: u64| {
        let products: Vec<Product> = (0..n).map(|i| Product::new(i, "home")).collect();
        std::fs::write(&path, serde_json::to_vec(&products).unwrap()).unwrap();
    };
    write(100);
    let store = Arc::new(CatalogStore::open(&path));

    let readers: Vec<_> = (0..4)
        .map(|t| {
            let store = store.clone();
            std::thread::spawn(move || {
                for _ in 0..50 {
                    let catalog = store.snapshot();
                    let ranked = rank(&format!("lamp-{}.jpg", t), catalog.products());
                    // Each snapshot is internally consistent
                    assert_eq!(ranked.len(), catalog.len());
                    assert!(ranked.windows(2).all(|w| w[0].score >= w[1].score));
                }
            })
        })
        .collect();

    for n in [150, 200, 250] {
        write(n);
        store.reload().unwrap();
    }

    for reader in readers {
        reader.join().unwrap();
    }
    assert_eq!(store.len(), 250);
}

use std::path::PathBuf;

use engine::{
    Category, CsvDirStore, Engine, EngineError, Item, ItemField, MAX_LISTS, MemoryStore, NewItem,
    Seed, SheetStore, ShoppingView, Unit, ValueInput, ZeroGroups, codec::Grid,
};
use uuid::Uuid;

fn engine_in_memory() -> Engine<MemoryStore> {
    Engine::builder().store(MemoryStore::new()).build().unwrap()
}

fn csv_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../target/test_sheets")
        .join(Uuid::new_v4().to_string())
}

async fn fill_to_cap(engine: &Engine<MemoryStore>) {
    for day in 1..=MAX_LISTS {
        engine
            .new_list(&format!("Lista 2024-06-{day:02}"), Seed::Empty)
            .await
            .unwrap();
    }
}

/// Memory store whose tab deletion always fails.
#[derive(Default)]
struct StickyStore {
    inner: MemoryStore,
}

impl SheetStore for StickyStore {
    async fn tab_titles(&self) -> engine::ResultEngine<Vec<String>> {
        self.inner.tab_titles().await
    }

    async fn add_tab(&self, title: &str) -> engine::ResultEngine<()> {
        self.inner.add_tab(title).await
    }

    async fn delete_tab(&self, _title: &str) -> engine::ResultEngine<()> {
        Err(EngineError::Storage("permission denied".to_string()))
    }

    async fn read_tab(&self, title: &str) -> engine::ResultEngine<Grid> {
        self.inner.read_tab(title).await
    }

    async fn write_tab(
        &self,
        title: &str,
        grid: &Grid,
        input: ValueInput,
    ) -> engine::ResultEngine<()> {
        self.inner.write_tab(title, grid, input).await
    }
}

#[tokio::test]
async fn eleventh_list_evicts_the_first_by_name() {
    let engine = engine_in_memory();
    fill_to_cap(&engine).await;

    let outcome = engine
        .new_list("Lista 2024-06-11", Seed::DefaultTemplate)
        .await
        .unwrap();
    assert_eq!(outcome.evicted.as_deref(), Some("Lista 2024-06-01"));
    assert_eq!(outcome.eviction_error, None);

    let lists = engine.lists().await.unwrap();
    assert_eq!(lists.len(), MAX_LISTS);
    assert!(!lists.contains(&"Lista 2024-06-01".to_string()));
    assert!(lists.contains(&"Lista 2024-06-11".to_string()));
}

#[tokio::test]
async fn copy_of_the_list_being_evicted_still_works() {
    let engine = engine_in_memory();
    fill_to_cap(&engine).await;
    engine
        .add_item(
            "Lista 2024-06-01",
            NewItem {
                name: "Café".to_string(),
                category: Category::Pantry,
                quantity: 1.0,
                unit: Unit::Piece,
            },
        )
        .await
        .unwrap();

    let outcome = engine
        .new_list(
            "Lista 2024-06-11",
            Seed::CopyOf("Lista 2024-06-01".to_string()),
        )
        .await
        .unwrap();
    assert_eq!(outcome.evicted.as_deref(), Some("Lista 2024-06-01"));
    let items = engine.list_items("Lista 2024-06-11").await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].name, "Café");
}

#[tokio::test]
async fn failed_eviction_is_reported_and_creation_proceeds() {
    let engine = Engine::builder()
        .store(StickyStore::default())
        .build()
        .unwrap();
    for day in 1..=MAX_LISTS {
        engine
            .new_list(&format!("Lista {day:02}"), Seed::Empty)
            .await
            .unwrap();
    }

    let outcome = engine.new_list("Lista 11", Seed::Empty).await.unwrap();
    assert_eq!(outcome.evicted, None);
    assert!(outcome.eviction_error.is_some());
    assert_eq!(engine.lists().await.unwrap().len(), MAX_LISTS + 1);
}

#[tokio::test]
async fn copy_resets_price_and_checkbox() {
    let engine = engine_in_memory();
    engine.new_list("Junio", Seed::Empty).await.unwrap();
    engine
        .save_list(
            "Junio",
            &[
                Item::new(Category::Meat, "Carne molida", 1.0, Unit::Kilogram)
                    .with_price(9.9)
                    .checked(true),
                Item::new(Category::Cleaning, "Jabón", 2.0, Unit::Piece).with_price(1.5),
            ],
        )
        .await
        .unwrap();

    engine
        .new_list("Julio", Seed::CopyOf("Junio".to_string()))
        .await
        .unwrap();

    let copy = engine.list_items("Julio").await.unwrap();
    assert_eq!(copy.len(), 2);
    assert!(copy.iter().all(|item| item.price == 0.0 && !item.is_checked));
    let source = engine.list_items("Junio").await.unwrap();
    assert!(source.iter().any(|item| item.is_checked));
}

#[tokio::test]
async fn template_shopping_trip_totals_sixty() {
    let engine = engine_in_memory();
    engine
        .new_list("Lista 2024-06-01", Seed::DefaultTemplate)
        .await
        .unwrap();

    let mut view = ShoppingView::load(&engine, "Lista 2024-06-01")
        .await
        .unwrap();
    let picked: Vec<_> = view.loaded().iter().take(3).map(|item| item.id).collect();
    for (id, price) in picked.iter().zip([10.0, 20.0, 30.0]) {
        assert!(view.set_checked(*id, true));
        assert!(view.set_price(*id, price).unwrap());
    }
    view.save(&engine).await.unwrap();

    let reloaded = ShoppingView::load(&engine, "Lista 2024-06-01")
        .await
        .unwrap();
    let totals = reloaded.totals(ZeroGroups::Keep).unwrap();
    assert_eq!(totals.grand_total, 60.0);
    assert_eq!(
        reloaded
            .loaded()
            .iter()
            .filter(|item| item.is_checked)
            .count(),
        3
    );
}

#[tokio::test]
async fn write_failure_keeps_shopping_edits() {
    let engine = engine_in_memory();
    engine
        .new_list("Lista", Seed::DefaultTemplate)
        .await
        .unwrap();
    let mut view = ShoppingView::load(&engine, "Lista").await.unwrap();
    let id = view.loaded()[0].id;
    view.set_checked(id, true);
    view.set_price(id, 4.0).unwrap();

    engine.store().set_offline(true);
    assert!(matches!(
        view.save(&engine).await,
        Err(EngineError::Storage(_))
    ));
    assert!(view.is_dirty());
    assert_eq!(view.totals(ZeroGroups::Keep).unwrap().grand_total, 4.0);

    engine.store().set_offline(false);
    view.save(&engine).await.unwrap();
    assert!(!view.is_dirty());
    assert_eq!(view.totals(ZeroGroups::Keep).unwrap().grand_total, 4.0);
}

#[tokio::test]
async fn by_name_commands_hit_every_duplicate() {
    let engine = engine_in_memory();
    engine.new_list("Lista", Seed::Empty).await.unwrap();
    engine
        .save_list(
            "Lista",
            &[
                Item::new(Category::Fruits, "Limón", 4.0, Unit::Piece),
                Item::new(Category::Fruits, "Limón", 1.0, Unit::Kilogram),
                Item::new(Category::Fruits, "Naranja", 6.0, Unit::Piece),
            ],
        )
        .await
        .unwrap();

    let matched = engine
        .update_item_field("Lista", "Limón", ItemField::Unit(Unit::Pound))
        .await
        .unwrap();
    assert_eq!(matched, 2);
    let items = engine.list_items("Lista").await.unwrap();
    assert_eq!(
        items.iter().filter(|item| item.unit == Unit::Pound).count(),
        2
    );

    assert_eq!(
        engine.remove_items_named("Lista", "Limón").await.unwrap(),
        2
    );
    let names: Vec<_> = engine
        .list_items("Lista")
        .await
        .unwrap()
        .into_iter()
        .map(|item| item.name)
        .collect();
    assert_eq!(names, ["Naranja"]);
}

#[tokio::test]
async fn csv_lists_survive_a_new_engine() {
    let root = csv_root();
    {
        let engine = Engine::builder()
            .store(CsvDirStore::open(&root).unwrap())
            .build()
            .unwrap();
        engine
            .new_list("Lista 2024-06-01", Seed::DefaultTemplate)
            .await
            .unwrap();
        engine
            .update_item_field(
                "Lista 2024-06-01",
                "Tomates",
                ItemField::Quantity(0.5),
            )
            .await
            .unwrap();
    }

    let engine = Engine::builder()
        .store(CsvDirStore::open(&root).unwrap())
        .build()
        .unwrap();
    assert_eq!(
        engine.lists().await.unwrap(),
        vec!["Lista 2024-06-01".to_string()]
    );
    let items = engine.list_items("Lista 2024-06-01").await.unwrap();
    assert_eq!(items.len(), 48);

    let raw = std::fs::read_to_string(root.join("Lista 2024-06-01.csv")).unwrap();
    assert!(raw.starts_with("category,name,quantity,unit,price,is_checked"));
    assert!(raw.contains("\"0,5\""));
}

#[tokio::test]
async fn deleted_list_surfaces_as_not_found() {
    let engine = engine_in_memory();
    engine.new_list("Lista", Seed::Empty).await.unwrap();
    engine.delete_list("Lista").await.unwrap();
    assert_eq!(
        engine.list_items("Lista").await,
        Err(EngineError::ListNotFound("Lista".to_string()))
    );
}

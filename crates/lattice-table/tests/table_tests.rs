//! Tests for the table controller driven through its public API.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;
use tracing_subscriber::EnvFilter;

use lattice_table::{
    BoxError, CellContent, CellRenderer, Column, RendererPoolingMode, RowKey, SelectionEvent,
    Stage, StageObserver, StageReport, TableConfig, TableController, TableError,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[derive(Debug, Clone)]
struct Person {
    name: String,
    city: String,
    id: String,
}

fn person(name: &str, city: &str, id: &str) -> Person {
    Person {
        name: name.to_string(),
        city: city.to_string(),
        id: id.to_string(),
    }
}

fn people_columns() -> Vec<Column<Person>> {
    vec![
        Column::function("Name", |p: &Person| p.name.clone()),
        Column::function("City", |p: &Person| p.city.clone()),
        Column::function("Id", |p: &Person| p.id.clone()).numeric(true),
    ]
}

fn people() -> Vec<Person> {
    vec![
        person("alice", "berlin", "id-10"),
        person("bob", "austin", "id-2"),
        person("anna", "boston", "id-042"),
        person("carl", "athens", "id-1"),
        person("dora", "bonn", "id-7"),
    ]
}

fn visible_keys<R: Send + Sync + 'static>(table: &TableController<R>) -> Vec<RowKey> {
    table.visible_rows().iter().map(|r| r.key()).collect()
}

fn visible_text<R: Send + Sync + 'static>(table: &TableController<R>, column: usize) -> Vec<String> {
    table
        .visible_rows()
        .iter()
        .map(|r| r.content()[column].to_string())
        .collect()
}

#[test]
fn test_processed_rows_match_records() {
    init_tracing();
    let table = TableController::new();
    table.set_model(people_columns(), people()).unwrap();

    assert_eq!(table.processed_row_count(), 5);
    for row in table.visible_rows() {
        assert_eq!(row.content().len(), 3);
    }
}

#[test]
fn test_numeric_sort_scenario() {
    init_tracing();
    let table = TableController::new();
    table
        .set_model(
            vec![Column::function("v", |v: &i64| *v).numeric(true)],
            vec![10, 1, 2],
        )
        .unwrap();

    // The model starts sorted by column 0 ascending.
    assert_eq!(visible_text(&table, 0), vec!["1", "2", "10"]);
}

#[test]
fn test_numeric_sort_with_negative_numbers() {
    init_tracing();
    let table = TableController::new();
    table
        .set_model(
            vec![Column::function("v", |v: &i64| *v).numeric(true)],
            vec![5, -10, 0, -1],
        )
        .unwrap();
    assert_eq!(visible_text(&table, 0), vec!["-10", "-1", "0", "5"]);

    table.set_sort_column(0).unwrap();
    assert_eq!(visible_text(&table, 0), vec!["5", "0", "-1", "-10"]);
}

#[test]
fn test_numeric_sort_with_prefixed_ids() {
    init_tracing();
    let table = TableController::new();
    table.set_model(people_columns(), people()).unwrap();

    table.set_sort_column(2).unwrap();
    assert_eq!(
        visible_text(&table, 2),
        vec!["id-1", "id-2", "id-7", "id-10", "id-042"]
    );

    table.set_sort_column(2).unwrap();
    assert_eq!(
        visible_text(&table, 2),
        vec!["id-042", "id-10", "id-7", "id-2", "id-1"]
    );
}

#[test]
fn test_two_filter_scenario() {
    init_tracing();
    let table = TableController::new();
    table
        .set_model(
            vec![
                Column::function("a", |r: &(&'static str, &'static str)| r.0),
                Column::function("b", |r: &(&'static str, &'static str)| r.1),
            ],
            vec![("abc", "x"), ("bcd", "y")],
        )
        .unwrap();

    table.set_filter(0, "^a").unwrap();
    table.set_filter(1, "").unwrap();
    assert_eq!(visible_keys(&table), vec![0]);
}

#[test]
fn test_filters_combine_across_columns() {
    init_tracing();
    let table = TableController::new();
    table.set_model(people_columns(), people()).unwrap();

    table.set_filter(0, "^a").unwrap();
    assert_eq!(table.filtered_row_count(), 2);
    table.set_filter(1, "^b").unwrap();
    assert_eq!(table.filtered_row_count(), 2);
    table.set_filter(1, "lin$").unwrap();
    assert_eq!(visible_keys(&table), vec![0]);

    table.set_filter(0, "").unwrap();
    table.set_filter(1, "").unwrap();
    assert_eq!(table.filtered_row_count(), 5);
}

#[test]
fn test_invalid_filter_other_columns_still_apply() {
    init_tracing();
    let table = TableController::new();
    table.set_model(people_columns(), people()).unwrap();
    table.set_filter(1, "^b").unwrap();

    let err = table.set_filter(0, "*").unwrap_err();
    assert!(matches!(err, TableError::FilterSyntax { column: 0, .. }));
    assert_eq!(table.filtered_row_count(), 3);
    assert_eq!(table.filters(), vec!["", "^b", ""]);
}

#[test]
fn test_page_scenario() {
    init_tracing();
    let config = TableConfig::default().with_page_size(2);
    let table = TableController::with_config(config).unwrap();
    table
        .set_model(
            vec![Column::function("n", |n: &i64| *n).numeric(true)],
            (0..5).collect(),
        )
        .unwrap();

    assert_eq!(table.number_of_pages(), 3);
    assert!(table.set_page(3));
    assert_eq!(table.current_page(), 3);
    assert_eq!(visible_keys(&table), vec![4]);

    assert!(!table.set_page(4));
    assert_eq!(visible_keys(&table), vec![4]);
}

#[test]
fn test_no_pages_when_everything_is_filtered() {
    init_tracing();
    let table = TableController::new();
    table.set_model(people_columns(), people()).unwrap();

    table.set_filter(0, "zzz").unwrap();
    assert_eq!(table.number_of_pages(), 0);
    assert!(table.visible_rows().is_empty());
    assert!(!table.set_page(1));
    assert_eq!(table.current_page(), 1);
}

#[test]
fn test_toggle_twice_scenario() {
    init_tracing();
    let table = TableController::new();
    table
        .set_model(
            vec![Column::function("n", |n: &i64| *n)],
            (0..10).collect(),
        )
        .unwrap();

    let events = Arc::new(Mutex::new(Vec::new()));
    let events_clone = events.clone();
    table.selection_changed.connect(move |event: &SelectionEvent| {
        events_clone.lock().push(event.clone());
    });

    table.toggle_selection(7).unwrap();
    table.toggle_selection(7).unwrap();

    assert!(!table.is_selected(7));
    let events = events.lock();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].new_value(), Some(true));
    assert_eq!(events[1].changed_key(), Some(7));
    assert_eq!(events[1].new_value(), Some(false));
    assert!(!events[1].selected_keys.contains(&7));
}

#[test]
fn test_selection_survives_filter_and_sort() {
    init_tracing();
    let table = TableController::new();
    table.set_model(people_columns(), people()).unwrap();

    // Hide "carl" (key 3), then select it while hidden.
    table.set_filter(0, "^a").unwrap();
    assert!(!visible_keys(&table).contains(&3));
    table.toggle_selection(3).unwrap();
    assert!(table.is_selected(3));

    table.set_filter(0, "").unwrap();
    table.set_sort_column(2).unwrap();
    assert!(visible_keys(&table).contains(&3));
    assert!(table.is_selected(3));
    assert_eq!(table.selected_keys(), vec![3]);
}

#[test]
fn test_reset_selection_emits_bulk_clear() {
    init_tracing();
    let table = TableController::new();
    table.set_model(people_columns(), people()).unwrap();
    table.toggle_selection(0).unwrap();
    table.toggle_selection(4).unwrap();

    let event = table.reset_selection();
    assert!(event.is_bulk_clear());
    assert!(event.selected_keys.is_empty());
    assert!(table.selected_keys().is_empty());
}

#[test]
fn test_failed_ingestion_keeps_previous_model() {
    init_tracing();
    let table = TableController::new();
    table.set_model(people_columns(), people()).unwrap();
    table.set_filter(0, "^a").unwrap();
    table.toggle_selection(2).unwrap();

    let failing = vec![Column::try_function("Name", |p: &Person| {
        if p.name == "bob" {
            Err::<CellContent, BoxError>("no bob".into())
        } else {
            Ok(CellContent::from(&p.name))
        }
    })];
    let err = table.set_model(failing, people()).unwrap_err();
    assert!(matches!(err, TableError::Extraction { row: 1, column: 0, .. }));

    assert_eq!(table.column_titles(), vec!["Name", "City", "Id"]);
    assert_eq!(table.filters()[0], "^a");
    assert_eq!(table.filtered_row_count(), 2);
    assert!(table.is_selected(2));
}

#[test]
fn test_new_model_resets_sort_filters_and_keys() {
    init_tracing();
    let table = TableController::new();
    table.set_model(people_columns(), people()).unwrap();
    table.set_sort_column(2).unwrap();
    table.set_filter(1, "^b").unwrap();

    table
        .set_model(people_columns(), vec![person("zed", "rome", "id-3")])
        .unwrap();
    assert!(table.is_sorted_by_column(0));
    assert_eq!(table.filters(), vec!["", "", ""]);
    assert_eq!(visible_keys(&table), vec![0]);
}

struct Badge {
    counters: Arc<RendererCounters>,
}

#[derive(Default)]
struct RendererCounters {
    created: AtomicUsize,
    disposed: AtomicUsize,
}

impl CellRenderer<Person> for Badge {
    fn render(&mut self, record: &Person) -> Result<CellContent, BoxError> {
        Ok(CellContent::from(format!("[{}]", record.city.to_uppercase())))
    }

    fn dispose(&mut self) {
        self.counters.disposed.fetch_add(1, Ordering::SeqCst);
    }
}

fn badge_columns(counters: &Arc<RendererCounters>) -> Vec<Column<Person>> {
    let counters = counters.clone();
    vec![
        Column::function("Name", |p: &Person| p.name.clone()),
        Column::renderer("City", move || {
            counters.created.fetch_add(1, Ordering::SeqCst);
            Badge {
                counters: counters.clone(),
            }
        }),
    ]
}

#[test]
fn test_renderer_column_is_pooled_by_default() {
    init_tracing();
    let counters = Arc::new(RendererCounters::default());
    let table = TableController::new();
    table.set_model(badge_columns(&counters), people()).unwrap();

    assert_eq!(counters.created.load(Ordering::SeqCst), 1);
    assert_eq!(counters.disposed.load(Ordering::SeqCst), 1);

    table.set_filter(1, "^\\[B").unwrap();
    assert_eq!(
        visible_text(&table, 1),
        vec!["[BERLIN]", "[BOSTON]", "[BONN]"]
    );
}

#[test]
fn test_renderer_column_per_cell() {
    init_tracing();
    let counters = Arc::new(RendererCounters::default());
    let config = TableConfig::default().with_pooling(RendererPoolingMode::PerCell);
    let table = TableController::with_config(config).unwrap();
    table.set_model(badge_columns(&counters), people()).unwrap();

    assert_eq!(counters.created.load(Ordering::SeqCst), 5);
    assert_eq!(counters.disposed.load(Ordering::SeqCst), 5);
}

#[derive(Default)]
struct RecordingObserver {
    started: Mutex<Vec<Stage>>,
    finished: Mutex<Vec<(Stage, StageReport)>>,
}

impl StageObserver for RecordingObserver {
    fn stage_started(&self, stage: Stage) {
        self.started.lock().push(stage);
    }

    fn stage_finished(&self, stage: Stage, report: StageReport) {
        self.finished.lock().push((stage, report));
    }
}

#[test]
fn test_stage_observer_sees_cascades() {
    init_tracing();
    let observer = Arc::new(RecordingObserver::default());
    let table = TableController::new();
    table.set_stage_observer(observer.clone());

    table.set_model(people_columns(), people()).unwrap();
    assert_eq!(
        *observer.started.lock(),
        vec![Stage::Process, Stage::Sort, Stage::Filter, Stage::Page]
    );

    observer.started.lock().clear();
    table.set_filter(0, "^a").unwrap();
    assert_eq!(*observer.started.lock(), vec![Stage::Filter, Stage::Page]);

    observer.started.lock().clear();
    table.set_page(1);
    assert_eq!(*observer.started.lock(), vec![Stage::Page]);

    let finished = observer.finished.lock();
    let (stage, report) = finished[finished.len() - 3];
    assert_eq!(stage, Stage::Filter);
    assert_eq!(report.rows_in, 5);
    assert_eq!(report.rows_out, 2);
}

#[test]
fn test_slots_can_read_the_controller() {
    init_tracing();
    let table = Arc::new(TableController::new());
    let seen = Arc::new(Mutex::new(Vec::new()));

    let weak = Arc::downgrade(&table);
    let seen_clone = seen.clone();
    table.view_changed.connect(move |_stage: &Stage| {
        if let Some(table) = weak.upgrade() {
            seen_clone.lock().push(table.filtered_row_count());
        }
    });

    table.set_model(people_columns(), people()).unwrap();
    table.set_filter(0, "^a").unwrap();
    assert_eq!(*seen.lock(), vec![5, 2]);
}

#[test]
fn test_config_from_toml() {
    init_tracing();
    let config = TableConfig::from_toml_str(
        r#"
        title = "People"
        page_size = 2
        selectable = false
        "#,
    )
    .unwrap();
    let table = TableController::with_config(config).unwrap();
    table.set_model(people_columns(), people()).unwrap();

    assert_eq!(table.title(), "People");
    assert_eq!(table.number_of_pages(), 3);
    assert!(!table.is_selectable());
    assert!(matches!(
        table.toggle_selection(0),
        Err(TableError::SelectionDisabled)
    ));
}

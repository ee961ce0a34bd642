use pretty_assertions::assert_eq;

use chrono::NaiveDate;
use taskers::kanban_board::TaskBoard;
use taskers::special_day::SpecialDayForm;
use taskers::storage::LocalStorage;
use taskers::store::{LocalRecord, LocalStore, PeriodSnapshot};
use taskers::task::{Bucket, TaskId};
use taskers::view::{View, YearMonth};

fn march() -> View {
    View::Monthly {
        month: YearMonth {
            year: 2025,
            month: 3,
        },
    }
}

fn record(id: i64, text: &str) -> LocalRecord {
    LocalRecord {
        id: TaskId::Num(id),
        text: text.to_string(),
    }
}

fn titles(board: &TaskBoard<LocalStore>, bucket: Bucket) -> Vec<String> {
    board
        .columns()
        .get(bucket)
        .iter()
        .map(|t| t.title.clone())
        .collect()
}

#[test]
fn snapshot_round_trips_for_any_key() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("local_storage.json");
    let snapshot = PeriodSnapshot {
        todo: vec![record(1, "Buy milk"), record(2, "Call mum")],
        in_process: vec![LocalRecord {
            id: TaskId::Text("abc".into()),
            text: "Write report".into(),
        }],
        done: vec![record(3, "Pay rent")],
    };

    let keys = [
        "monthlyTasks_2025-03",
        "weeklyTasks_2024-05-12",
        "specialDays",
        "odd key with spaces",
    ];
    let mut store = LocalStore::new(LocalStorage::open(&path).unwrap());
    for key in keys {
        store.write_snapshot(key, &snapshot).unwrap();
    }

    let reopened = LocalStore::new(LocalStorage::open(&path).unwrap());
    for key in keys {
        assert_eq!(reopened.read_snapshot(key).unwrap(), snapshot);
    }
    assert_eq!(
        reopened.read_snapshot("monthlyTasks_1999-01").unwrap(),
        PeriodSnapshot::default()
    );
}

#[test]
fn snapshot_uses_browser_field_names() {
    let snapshot = PeriodSnapshot {
        todo: vec![record(1, "a")],
        in_process: vec![record(2, "b")],
        done: vec![],
    };
    let json = serde_json::to_value(&snapshot).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "todo": [{"id": 1, "text": "a"}],
            "inProcess": [{"id": 2, "text": "b"}],
            "done": []
        })
    );
}

#[tokio::test]
async fn board_changes_survive_reopening() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("local_storage.json");

    let mut board = TaskBoard::new(march(), LocalStore::new(LocalStorage::open(&path).unwrap()));
    board.load().await.unwrap();
    assert!(board.columns().is_empty());

    let milk = board.add_task("Buy milk").await.unwrap().unwrap();
    let rent = board.add_task("Pay rent").await.unwrap().unwrap();
    let call = board.add_task("Call mum").await.unwrap().unwrap();
    assert_ne!(milk, rent);
    assert_ne!(rent, call);

    board.move_task(Bucket::Todo, 1, Bucket::Done, 0).await.unwrap();
    board.move_task(Bucket::Todo, 1, Bucket::Todo, 0).await.unwrap();
    board.edit_title(&milk, "Buy oat milk").await.unwrap();
    board.move_to(&milk, Bucket::InProcess).await.unwrap();

    let mut reopened =
        TaskBoard::new(march(), LocalStore::new(LocalStorage::open(&path).unwrap()));
    reopened.load().await.unwrap();
    assert_eq!(titles(&reopened, Bucket::Todo), vec!["Call mum"]);
    assert_eq!(titles(&reopened, Bucket::InProcess), vec!["Buy oat milk"]);
    assert_eq!(titles(&reopened, Bucket::Done), vec!["Pay rent"]);
    assert_eq!(reopened.columns().done[0].bucket, Bucket::Done);

    reopened.delete_task(&rent, Bucket::Done).await.unwrap();
    let mut again = TaskBoard::new(march(), LocalStore::new(LocalStorage::open(&path).unwrap()));
    again.load().await.unwrap();
    assert!(again.columns().done.is_empty());
    assert_eq!(again.columns().len(), 2);
}

#[tokio::test]
async fn periods_are_kept_apart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("local_storage.json");

    let mut board = TaskBoard::new(march(), LocalStore::new(LocalStorage::open(&path).unwrap()));
    board.load().await.unwrap();
    board.add_task("March thing").await.unwrap();

    board.set_view(march().next()).await.unwrap();
    assert!(board.columns().is_empty());
    board.add_task("April thing").await.unwrap();

    board.set_view(march()).await.unwrap();
    assert_eq!(titles(&board, Bucket::Todo), vec!["March thing"]);
}

#[tokio::test]
async fn weekly_board_scenarios() {
    let dir = tempfile::tempdir().unwrap();
    let view = View::weekly_containing(NaiveDate::from_ymd_opt(2024, 5, 15).unwrap());
    let mut storage = LocalStorage::open(dir.path().join("ls.json")).unwrap();
    storage
        .set_json(
            &view.period_key(),
            &PeriodSnapshot {
                todo: vec![record(5, "five"), record(6, "six")],
                in_process: vec![record(7, "seven")],
                done: vec![record(8, "eight")],
            },
        )
        .unwrap();

    let mut board = TaskBoard::new(view, LocalStore::new(storage));
    board.load().await.unwrap();

    board.move_task(Bucket::Todo, 0, Bucket::Done, 0).await.unwrap();
    assert!(board.columns().todo.iter().all(|t| t.id != TaskId::Num(5)));
    assert_eq!(board.columns().done[0].id, TaskId::Num(5));
    assert_eq!(board.columns().done[0].bucket, Bucket::Done);

    board
        .delete_task(&TaskId::Num(7), Bucket::InProcess)
        .await
        .unwrap();
    assert!(board.columns().in_process.is_empty());
    assert_eq!(titles(&board, Bucket::Todo), vec!["six"]);
    assert_eq!(titles(&board, Bucket::Done), vec!["five", "eight"]);

    // New ids never collide with ones already stored.
    let id = board.add_task("nine").await.unwrap().unwrap();
    assert!(matches!(id, TaskId::Num(n) if n > 8));
}

#[tokio::test]
async fn special_day_from_another_board_is_kept() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("local_storage.json");
    let weekly = View::weekly_containing(NaiveDate::from_ymd_opt(2024, 5, 15).unwrap());

    let mut board = TaskBoard::new(weekly, LocalStore::new(LocalStorage::open(&path).unwrap()));
    board.load().await.unwrap();
    let id = board
        .add_special_day(SpecialDayForm {
            year: 2025,
            month: Some(3),
            day: Some(8),
            title: "Flowers".into(),
        })
        .await
        .unwrap();
    assert!(board.columns().is_empty());

    let mut special = TaskBoard::new(
        View::SpecialDays,
        LocalStore::new(LocalStorage::open(&path).unwrap()),
    );
    special.load().await.unwrap();
    let todo = &special.columns().todo;
    assert_eq!(todo.len(), 1);
    assert_eq!(todo[0].id, id);
    assert_eq!(todo[0].title, "Flowers");
    assert!(todo[0].is_special_day);

    let mut again = TaskBoard::new(weekly, LocalStore::new(LocalStorage::open(&path).unwrap()));
    again.load().await.unwrap();
    assert!(again.columns().is_empty());
}

#[tokio::test]
async fn special_days_board_keeps_its_own_additions() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("local_storage.json");
    let form = |title: &str| SpecialDayForm {
        year: 2025,
        month: Some(12),
        day: Some(25),
        title: title.into(),
    };

    let mut special = TaskBoard::new(
        View::SpecialDays,
        LocalStore::new(LocalStorage::open(&path).unwrap()),
    );
    special.load().await.unwrap();
    let first = special.add_special_day(form("Gifts")).await.unwrap();
    let second = special.add_special_day(form("Dinner")).await.unwrap();
    assert_ne!(first, second);

    let mut reopened = TaskBoard::new(
        View::SpecialDays,
        LocalStore::new(LocalStorage::open(&path).unwrap()),
    );
    reopened.load().await.unwrap();
    assert_eq!(titles(&reopened, Bucket::Todo), vec!["Gifts", "Dinner"]);
}

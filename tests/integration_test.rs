// Integration tests for userdir-manager: controller scenarios against an
// in-memory gateway, the threaded dispatcher, config files and rendering.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use userdir_manager::app::controller::{Command, Outcome, reconcile};
use userdir_manager::app::dispatch::Dispatcher;
use userdir_manager::app::form::{ActiveForm, FormField};
use userdir_manager::app::{AppState, InputMode, ModalState, NoticeLevel};
use userdir_manager::error::Result as NetResult;
use userdir_manager::model::{NewUser, User, UserId, UserPatch};
use userdir_manager::remote::UserGateway;
use userdir_manager::NetworkError;

/// Gateway double: keeps records in memory and can be told to fail.
struct FakeGateway {
    users: Mutex<Vec<User>>,
    next_id: Mutex<UserId>,
    fail: bool,
}

impl FakeGateway {
    fn with(users: Vec<User>) -> Self {
        let next = users.iter().map(|u| u.id).max().unwrap_or(10) + 1;
        Self { users: Mutex::new(users), next_id: Mutex::new(next), fail: false }
    }

    fn failing() -> Self {
        Self { fail: true, ..Self::with(vec![]) }
    }

    fn check(&self) -> NetResult<()> {
        if self.fail {
            return Err(NetworkError::Status { status: 503, message: "unavailable".into() });
        }
        Ok(())
    }
}

#[async_trait]
impl UserGateway for FakeGateway {
    async fn list(&self) -> NetResult<Vec<User>> {
        self.check()?;
        Ok(self.users.lock().unwrap().clone())
    }

    async fn create(&self, draft: &NewUser) -> NetResult<User> {
        self.check()?;
        let mut next = self.next_id.lock().unwrap();
        let user = User::new(*next, &draft.name, &draft.email, &draft.address.city);
        *next += 1;
        self.users.lock().unwrap().push(user.clone());
        Ok(user)
    }

    async fn update(&self, _id: UserId, _patch: &UserPatch) -> NetResult<()> {
        self.check()
    }

    async fn delete(&self, _id: UserId) -> NetResult<()> {
        self.check()
    }
}

fn leanne() -> User {
    User::new(1, "Leanne Graham", "Sincere@april.biz", "Gwenborough")
}

fn ervin() -> User {
    User::new(2, "Ervin Howell", "Shanna@melissa.tv", "Wisokyburgh")
}

fn fill_create_form(app: &mut AppState, name: &str, email: &str, city: &str) {
    app.form = ActiveForm::open_create();
    app.input_mode = InputMode::Form;
    app.form.set_field(FormField::Name, name);
    app.form.set_field(FormField::Email, email);
    app.form.set_field(FormField::City, city);
}

fn submitted_ticket(app: &mut AppState) -> userdir_manager::app::form::Ticket {
    match app.form.submit() {
        Ok(Some(Command::Create { ticket, .. } | Command::Update { ticket, .. })) => ticket,
        other => panic!("form did not submit: {other:?}"),
    }
}

async fn run(app: &mut AppState, gateway: &FakeGateway, cmd: Command) {
    app.in_flight += 1;
    let outcome = cmd.execute(gateway).await;
    reconcile(app, outcome);
}

#[tokio::test]
async fn initial_load_populates_store() {
    let gw = FakeGateway::with(vec![leanne(), ervin()]);
    let mut app = AppState::default();
    run(&mut app, &gw, Command::Refresh).await;

    assert_eq!(app.store.visible(), &[leanne(), ervin()]);
    assert_eq!(app.in_flight, 0);
    assert_eq!(app.notice.as_ref().unwrap().message, "Loaded 2 users");
}

#[tokio::test]
async fn failed_load_keeps_previous_state_and_tells_operator() {
    let mut app = AppState::default();
    app.store.load(vec![leanne()]).unwrap();
    run(&mut app, &FakeGateway::failing(), Command::Refresh).await;

    assert_eq!(app.store.all(), &[leanne()]);
    assert_eq!(app.input_mode, InputMode::Modal);
    assert!(matches!(&app.modal, Some(ModalState::Info { message, .. }) if message.contains("503")));
    assert_eq!(app.notice.as_ref().unwrap().level, NoticeLevel::Error);
}

#[tokio::test]
async fn create_on_empty_store_appends_gateway_record_and_closes_form() {
    let gw = FakeGateway::with(vec![]);
    let mut app = AppState::default();
    fill_create_form(&mut app, "Ada", "ada@x.com", "London");

    let cmd = app.form.submit().unwrap().unwrap();
    run(&mut app, &gw, cmd).await;

    assert_eq!(app.store.all(), &[User::new(11, "Ada", "ada@x.com", "London")]);
    assert_eq!(app.form, ActiveForm::None);
    assert_eq!(app.input_mode, InputMode::Normal);
}

#[tokio::test]
async fn failed_create_leaves_store_and_keeps_form_open_with_error() {
    let mut app = AppState::default();
    app.store.load(vec![leanne()]).unwrap();
    fill_create_form(&mut app, "Ada", "ada@x.com", "London");

    let cmd = app.form.submit().unwrap().unwrap();
    run(&mut app, &FakeGateway::failing(), cmd).await;

    assert_eq!(app.store.all(), &[leanne()]);
    let draft = app.form.draft().expect("form stays open");
    assert!(!draft.submitting);
    assert!(draft.error.as_deref().unwrap().contains("503"));
    assert_eq!(draft.name, "Ada");
    assert_eq!(app.input_mode, InputMode::Form);
}

#[tokio::test]
async fn created_record_with_existing_id_is_rejected() {
    let mut app = AppState::default();
    app.store.load(vec![leanne()]).unwrap();
    fill_create_form(&mut app, "Ada", "ada@x.com", "London");
    let ticket = submitted_ticket(&mut app);

    reconcile(&mut app, Outcome::Created { ticket, result: Ok(User::new(1, "Ada", "ada@x.com", "London")) });

    assert_eq!(app.store.all(), &[leanne()]);
    assert_eq!(app.form.draft().unwrap().error.as_deref(), Some("duplicate user id 1"));
}

#[tokio::test]
async fn update_patches_only_the_target_record() {
    let gw = FakeGateway::with(vec![leanne(), ervin()]);
    let mut app = AppState::default();
    run(&mut app, &gw, Command::Refresh).await;

    app.form = ActiveForm::open_edit(&leanne());
    app.input_mode = InputMode::Form;
    app.form.set_field(FormField::Email, "leanne@example.com");
    app.form.set_field(FormField::City, "Oslo");
    let cmd = app.form.submit().unwrap().unwrap();
    run(&mut app, &gw, cmd).await;

    let updated = app.store.get(1).unwrap();
    assert_eq!(updated.name, "Leanne Graham");
    assert_eq!(updated.email, "leanne@example.com");
    assert_eq!(updated.city(), "Oslo");
    assert_eq!(app.store.get(2), Some(&ervin()));
    assert_eq!(app.form, ActiveForm::None);
}

#[tokio::test]
async fn failed_update_changes_nothing() {
    let mut app = AppState::default();
    app.store.load(vec![leanne(), ervin()]).unwrap();
    app.form = ActiveForm::open_edit(&ervin());
    app.input_mode = InputMode::Form;
    app.form.set_field(FormField::Name, "Renamed");
    let cmd = app.form.submit().unwrap().unwrap();
    run(&mut app, &FakeGateway::failing(), cmd).await;

    assert_eq!(app.store.all(), &[leanne(), ervin()]);
    assert!(matches!(app.form, ActiveForm::Editing { id: 2, .. }));
}

#[tokio::test]
async fn delete_removes_only_that_id() {
    let gw = FakeGateway::with(vec![leanne(), ervin()]);
    let mut app = AppState::default();
    run(&mut app, &gw, Command::Refresh).await;
    run(&mut app, &gw, Command::Delete { id: 1 }).await;

    assert_eq!(app.store.all(), &[ervin()]);
    assert!(app.store.get(1).is_none());
}

#[tokio::test]
async fn failed_delete_keeps_record() {
    let mut app = AppState::default();
    app.store.load(vec![leanne(), ervin()]).unwrap();
    run(&mut app, &FakeGateway::failing(), Command::Delete { id: 1 }).await;

    assert_eq!(app.store.all().len(), 2);
    assert!(matches!(app.modal, Some(ModalState::Info { .. })));
}

#[test]
fn late_answer_for_closed_form_still_updates_store() {
    let mut app = AppState::default();
    app.store.load(vec![leanne()]).unwrap();
    fill_create_form(&mut app, "Ervin Howell", "Shanna@melissa.tv", "Wisokyburgh");
    let ticket = submitted_ticket(&mut app);
    // operator cancelled the create form and opened an edit form meanwhile
    app.form = ActiveForm::open_edit(&leanne());
    app.input_mode = InputMode::Form;

    reconcile(&mut app, Outcome::Created { ticket, result: Ok(ervin()) });

    assert_eq!(app.store.all(), &[leanne(), ervin()]);
    assert!(matches!(app.form, ActiveForm::Editing { id: 1, .. }));
}

#[test]
fn late_create_success_leaves_new_create_form_open() {
    let mut app = AppState::default();
    fill_create_form(&mut app, "First", "first@x.com", "Rome");
    let stale = submitted_ticket(&mut app);
    app.form.close();
    fill_create_form(&mut app, "Second", "second@x.com", "Oslo");

    reconcile(&mut app, Outcome::Created { ticket: stale, result: Ok(User::new(11, "First", "first@x.com", "Rome")) });

    assert!(app.store.contains(11));
    let draft = app.form.draft().expect("new form stays open");
    assert_eq!(draft.name, "Second");
    assert_eq!(app.input_mode, InputMode::Form);
}

#[test]
fn late_create_failure_does_not_touch_pending_create_form() {
    let mut app = AppState::default();
    fill_create_form(&mut app, "First", "first@x.com", "Rome");
    let stale = submitted_ticket(&mut app);
    app.form.close();
    fill_create_form(&mut app, "Second", "second@x.com", "Oslo");
    let current = submitted_ticket(&mut app);

    let failure = NetworkError::Status { status: 500, message: "boom".into() };
    reconcile(&mut app, Outcome::Created { ticket: stale, result: Err(failure) });

    let draft = app.form.draft().unwrap();
    assert!(draft.submitting);
    assert!(draft.error.is_none());
    assert_eq!(app.form.submit(), Err(userdir_manager::FormError::Busy));
    assert!(matches!(&app.modal, Some(ModalState::Info { title, .. }) if title == "Save failed"));

    // the live submission's own answer still closes it
    app.close_modal();
    reconcile(&mut app, Outcome::Created { ticket: current, result: Ok(User::new(12, "Second", "second@x.com", "Oslo")) });
    assert_eq!(app.form, ActiveForm::None);
}

#[test]
fn late_update_answers_skip_reopened_edit_form() {
    let mut app = AppState::default();
    app.store.load(vec![leanne()]).unwrap();
    app.form = ActiveForm::open_edit(&leanne());
    app.input_mode = InputMode::Form;
    app.form.set_field(FormField::City, "Oslo");
    let stale = submitted_ticket(&mut app);
    let patch = app.form.draft().unwrap().to_patch();

    // reopen the same record and start typing
    app.form = ActiveForm::open_edit(&leanne());
    app.form.set_field(FormField::Name, "Leanne G.");

    reconcile(&mut app, Outcome::Updated {
        ticket: stale,
        id: 1,
        patch: patch.clone(),
        result: Err(NetworkError::Status { status: 500, message: "boom".into() }),
    });
    let draft = app.form.draft().unwrap();
    assert!(draft.error.is_none());
    assert_eq!(draft.name, "Leanne G.");

    app.close_modal();
    reconcile(&mut app, Outcome::Updated { ticket: stale, id: 1, patch, result: Ok(()) });
    assert_eq!(app.store.get(1).unwrap().city(), "Oslo");
    assert!(matches!(&app.form, ActiveForm::Editing { id: 1, draft } if draft.name == "Leanne G."));
    assert_eq!(app.input_mode, InputMode::Form);
}

#[test]
fn late_error_keeps_open_dialog_and_search_input() {
    let mut app = AppState::default();
    app.store.load(vec![leanne(), ervin()]).unwrap();
    let confirm = ModalState::DeleteConfirm { id: 2, name: "Ervin Howell".into(), selected: 1 };
    app.open_modal(confirm.clone());

    let failure = || NetworkError::Status { status: 502, message: "bad gateway".into() };
    reconcile(&mut app, Outcome::Listed(Err(failure())));
    assert_eq!(app.modal, Some(confirm));
    assert_eq!(app.notice.as_ref().unwrap().level, NoticeLevel::Error);

    app.close_modal();
    app.input_mode = InputMode::Search;
    app.search_query = "erv".into();
    reconcile(&mut app, Outcome::Deleted { id: 1, result: Err(failure()) });
    assert_eq!(app.input_mode, InputMode::Search);
    assert!(app.modal.is_none());
    assert_eq!(app.search_query, "erv");
    assert!(app.notice.as_ref().unwrap().message.starts_with("Delete failed"));
}

#[test]
fn outcomes_apply_in_arrival_order() {
    let mut app = AppState::default();
    app.store.load(vec![leanne(), ervin()]).unwrap();

    // a delete answered before a stale list: the list lands last and wins
    reconcile(&mut app, Outcome::Deleted { id: 1, result: Ok(()) });
    assert_eq!(app.store.all(), &[ervin()]);
    reconcile(&mut app, Outcome::Listed(Ok(vec![leanne(), ervin()])));
    assert_eq!(app.store.all(), &[leanne(), ervin()]);
}

#[test]
fn selection_follows_shrinking_list() {
    let mut app = AppState::default();
    app.store.load(vec![leanne(), ervin()]).unwrap();
    app.selected_index = 1;
    reconcile(&mut app, Outcome::Deleted { id: 2, result: Ok(()) });
    assert_eq!(app.selected_index, 0);
    assert_eq!(app.selected_user(), Some(&leanne()));
}

#[test]
fn dispatcher_runs_commands_on_runtime() {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let gw = Arc::new(FakeGateway::with(vec![leanne(), ervin()]));
    let mut dispatcher = Dispatcher::new(gw, runtime.handle().clone());
    let mut app = AppState::default();

    userdir_manager::app::update::send(&mut app, &dispatcher, Command::Refresh);
    assert_eq!(app.in_flight, 1);
    let outcome = dispatcher.wait_next().expect("outcome");
    reconcile(&mut app, outcome);

    assert_eq!(app.store.len(), 2);
    assert_eq!(app.in_flight, 0);
    assert!(dispatcher.try_next().is_none());
}

#[test]
fn theme_and_keymap_config_roundtrip() {
    use std::time::{SystemTime, UNIX_EPOCH};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use userdir_manager::app::config::ConfigPaths;
    use userdir_manager::app::keymap::{KEYBINDS_FILE, KeyAction, Keymap};
    use userdir_manager::app::theme::{THEME_FILE, Theme};

    let nonce = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos();
    let dir = std::env::temp_dir().join(format!("udm_conf_{}_{}", std::process::id(), nonce));
    let paths = ConfigPaths::new(Some(dir.clone()));

    // missing files are created with defaults
    let theme = Theme::load_or_init(&paths);
    let _ = Keymap::load_or_init(&paths);
    assert!(dir.join(THEME_FILE).exists());
    assert!(dir.join(KEYBINDS_FILE).exists());
    assert_eq!(Theme::from_file(&dir.join(THEME_FILE)), Some(theme));

    // user overrides are picked up on top of the defaults
    let mut text = std::fs::read_to_string(dir.join(KEYBINDS_FILE)).unwrap();
    text.push_str("Refresh = Ctrl+r\nNotAnAction = x\n");
    std::fs::write(dir.join(KEYBINDS_FILE), text).unwrap();
    let km = Keymap::from_file(&dir.join(KEYBINDS_FILE)).unwrap();
    assert_eq!(km.resolve(&KeyEvent::new(KeyCode::Char('r'), KeyModifiers::CONTROL)), Some(KeyAction::Refresh));
    assert_eq!(km.resolve(&KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE)), Some(KeyAction::Quit));
    assert_eq!(km.resolve(&KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE)), None);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn renders_table_form_and_status() {
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn screen(terminal: &Terminal<TestBackend>) -> String {
        terminal.backend().buffer().content.iter().map(|c| c.symbol()).collect()
    }

    let mut app = AppState::default();
    app.store.load(vec![leanne(), ervin()]).unwrap();
    app.notify("Loaded 2 users");

    let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
    terminal.draw(|f| userdir_manager::ui::render(f, &mut app)).unwrap();
    let text = screen(&terminal);
    assert!(text.contains("Leanne Graham"));
    assert!(text.contains("Gwenborough"));
    assert!(text.contains("Loaded 2 users"));
    assert!(app.rows_per_page > 0);

    fill_create_form(&mut app, "Ada", "", "");
    terminal.draw(|f| userdir_manager::ui::render(f, &mut app)).unwrap();
    assert!(screen(&terminal).contains("Create New User"));
}

//! Recording fakes for the collaborator traits.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use super::context::{Context, Platform, PresenceStatus, Viewport, World};
use super::handles::{CompletionHandle, OperationKind};
use super::invite::Privilege;
use super::message::PendingMessage;
use super::player::{LoginStatus, UserId};
use super::provider::{ConnectError, JoinTarget, SessionProvider, SessionSettings, SessionState};

/// Side effect observed on a collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    HideLoadingScreen,
    ForceDisableSplitscreen(bool),
    FocusGameView,
    ShowMessage(String),
    Browse(String),
    ServerTravel(String),
    ClientTravel(String),
    RoundEnd(usize, bool),
    FinishAndExit,
    KillPlayer(usize),
    LabelQuitter(usize),
    ShowInGameMenu,
    PlayReplay(String),
    SetMultiplayer(String, bool),
    SetPresence(String, String, String),
    StartPrivilegeCheck(String),
    CancelPrivilegeCheck,
    EndSession(String),
    DestroySession(String),
}

type Log = Rc<RefCell<Vec<Call>>>;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub struct FakeViewport {
    log: Log,
    pub dedicated: bool,
    pub active: bool,
}

impl Viewport for FakeViewport {
    fn is_dedicated_server(&self) -> bool {
        self.dedicated
    }

    fn is_active_view(&self) -> bool {
        self.active
    }

    fn hide_loading_screen(&mut self) {
        self.log.borrow_mut().push(Call::HideLoadingScreen);
    }

    fn set_force_disable_splitscreen(&mut self, disabled: bool) {
        self.log.borrow_mut().push(Call::ForceDisableSplitscreen(disabled));
    }

    fn focus_game_view(&mut self) {
        self.log.borrow_mut().push(Call::FocusGameView);
    }

    fn show_message(&mut self, message: &PendingMessage) {
        self.log
            .borrow_mut()
            .push(Call::ShowMessage(message.display_text.clone()));
    }
}

pub struct FakeWorld {
    log: Log,
    pub current_map: Option<String>,
    pub fail_browse: bool,
    pub has_player_controller: bool,
    pub has_game_state: bool,
    pub menu_visible: bool,
}

impl World for FakeWorld {
    fn current_map(&self) -> Option<String> {
        self.current_map.clone()
    }

    fn browse(&mut self, map: &str) -> Result<(), String> {
        self.log.borrow_mut().push(Call::Browse(map.to_string()));
        if self.fail_browse {
            return Err("map not found".to_string());
        }
        self.current_map = Some(map.to_string());
        Ok(())
    }

    fn server_travel(&mut self, url: &str) {
        self.log.borrow_mut().push(Call::ServerTravel(url.to_string()));
    }

    fn client_travel(&mut self, url: &str) {
        self.log.borrow_mut().push(Call::ClientTravel(url.to_string()));
    }

    fn has_player_controller(&self) -> bool {
        self.has_player_controller
    }

    fn has_game_state(&self) -> bool {
        self.has_game_state
    }

    fn send_round_end_event(&mut self, player: usize, won: bool) {
        self.log.borrow_mut().push(Call::RoundEnd(player, won));
    }

    fn request_finish_and_exit_to_main_menu(&mut self) {
        self.log.borrow_mut().push(Call::FinishAndExit);
    }

    fn kill_player(&mut self, player: usize) {
        self.log.borrow_mut().push(Call::KillPlayer(player));
    }

    fn label_quitter(&mut self, player: usize) {
        self.log.borrow_mut().push(Call::LabelQuitter(player));
    }

    fn is_paused_or_menu_visible(&self) -> bool {
        self.menu_visible
    }

    fn show_in_game_menu(&mut self) {
        self.log.borrow_mut().push(Call::ShowInGameMenu);
    }

    fn play_replay(&mut self, name: &str) {
        self.log.borrow_mut().push(Call::PlayReplay(name.to_string()));
    }
}

pub struct FakePlatform {
    log: Log,
    pub login: HashMap<UserId, LoginStatus>,
    pub controller_ids: HashMap<i32, UserId>,
    pub license_valid: bool,
}

impl Platform for FakePlatform {
    fn login_status(&self, user: &UserId) -> LoginStatus {
        self.login.get(user).copied().unwrap_or_default()
    }

    fn unique_id_for_controller(&self, controller_id: i32) -> Option<UserId> {
        self.controller_ids.get(&controller_id).cloned()
    }

    fn license_valid(&self) -> bool {
        self.license_valid
    }

    fn set_using_multiplayer_features(&mut self, user: &UserId, enabled: bool) {
        self.log
            .borrow_mut()
            .push(Call::SetMultiplayer(user.to_string(), enabled));
    }

    fn set_presence(&mut self, user: &UserId, presence: &PresenceStatus) {
        self.log
            .borrow_mut()
            .push(Call::SetPresence(
                user.to_string(),
                presence.key.clone(),
                presence.value.clone(),
            ));
    }

    fn start_privilege_check(&mut self, user: &UserId, _privilege: Privilege) {
        self.log
            .borrow_mut()
            .push(Call::StartPrivilegeCheck(user.to_string()));
    }

    fn cancel_privilege_check(&mut self) {
        self.log.borrow_mut().push(Call::CancelPrivilegeCheck);
    }
}

pub struct FakeSessions {
    log: Log,
    invocations: Cell<usize>,
    next_handle: u64,
    /// Verdict returned by every request
    pub accept: bool,
    pub state: SessionState,
    pub connect_string: Option<String>,
    pub hosted: Vec<SessionSettings>,
    pub joined: Vec<JoinTarget>,
    /// (lan, presence) per search
    pub searches: Vec<(bool, bool)>,
    pub registered: Vec<UserId>,
    pub unsubscribed: Vec<CompletionHandle>,
}

impl FakeSessions {
    /// Number of provider calls of any kind.
    pub fn invocations(&self) -> usize {
        self.invocations.get()
    }

    fn count(&self) {
        self.invocations.set(self.invocations.get() + 1);
    }
}

impl SessionProvider for FakeSessions {
    fn subscribe(&mut self, _kind: OperationKind) -> CompletionHandle {
        self.count();
        self.next_handle += 1;
        CompletionHandle(self.next_handle)
    }

    fn unsubscribe(&mut self, handle: CompletionHandle) {
        self.count();
        self.unsubscribed.push(handle);
    }

    fn host_session(&mut self, _user: &UserId, _session: &str, settings: &SessionSettings) -> bool {
        self.count();
        self.hosted.push(settings.clone());
        self.accept
    }

    fn join_session(&mut self, _user: &UserId, _session: &str, target: &JoinTarget) -> bool {
        self.count();
        self.joined.push(target.clone());
        self.accept
    }

    fn find_sessions(&mut self, _user: &UserId, _session: &str, lan: bool, presence: bool) -> bool {
        self.count();
        self.searches.push((lan, presence));
        self.accept
    }

    fn end_session(&mut self, session: &str) -> bool {
        self.count();
        self.log.borrow_mut().push(Call::EndSession(session.to_string()));
        self.accept
    }

    fn destroy_session(&mut self, session: &str) -> bool {
        self.count();
        self.log
            .borrow_mut()
            .push(Call::DestroySession(session.to_string()));
        self.accept
    }

    fn register_local_player(&mut self, user: &UserId, _session: &str) -> bool {
        self.count();
        self.registered.push(user.clone());
        self.accept
    }

    fn session_state(&self, _session: &str) -> SessionState {
        self.count();
        self.state
    }

    fn resolved_connect_string(&self, session: &str) -> Result<String, ConnectError> {
        self.count();
        self.connect_string
            .clone()
            .ok_or_else(|| ConnectError::Unresolved(session.to_string()))
    }
}

/// All four fakes sharing one call log.
pub struct Harness {
    log: Log,
    pub viewport: FakeViewport,
    pub world: FakeWorld,
    pub platform: FakePlatform,
    pub sessions: FakeSessions,
}

impl Harness {
    pub fn new() -> Self {
        init_tracing();
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        Self {
            viewport: FakeViewport {
                log: log.clone(),
                dedicated: false,
                active: true,
            },
            world: FakeWorld {
                log: log.clone(),
                current_map: None,
                fail_browse: false,
                has_player_controller: true,
                has_game_state: false,
                menu_visible: false,
            },
            platform: FakePlatform {
                log: log.clone(),
                login: HashMap::new(),
                controller_ids: HashMap::new(),
                license_valid: true,
            },
            sessions: FakeSessions {
                log: log.clone(),
                invocations: Cell::new(0),
                next_handle: 0,
                accept: true,
                state: SessionState::NoSession,
                connect_string: Some("127.0.0.1:7777".to_string()),
                hosted: Vec::new(),
                joined: Vec::new(),
                searches: Vec::new(),
                registered: Vec::new(),
                unsubscribed: Vec::new(),
            },
            log,
        }
    }

    pub fn ctx(&mut self) -> Context<'_> {
        Context::new(&mut self.viewport, &mut self.world, &mut self.platform)
            .with_sessions(&mut self.sessions)
    }

    pub fn ctx_without_sessions(&mut self) -> Context<'_> {
        Context::new(&mut self.viewport, &mut self.world, &mut self.platform)
    }

    pub fn calls(&self) -> Vec<Call> {
        self.log.borrow().clone()
    }

    pub fn clear_calls(&self) {
        self.log.borrow_mut().clear();
    }

    /// Texts handed to the message dialog, in order.
    pub fn shown_messages(&self) -> Vec<String> {
        self.log
            .borrow()
            .iter()
            .filter_map(|call| match call {
                Call::ShowMessage(text) => Some(text.clone()),
                _ => None,
            })
            .collect()
    }
}

/*
 * Built-in Protocols
 *
 * Standard protocol definitions for common resources:
 * - FileProtocol: File open/close lifecycle
 * - LockProtocol: Lock acquire/release lifecycle
 * - ConnectionProtocol: Network connection lifecycle
 *
 * These protocols are used out-of-the-box without configuration.
 */

use crate::features::typestate::domain::{Action, Protocol, State};

/// File protocol
///
/// States: Closed → Open → Closed
///
/// Transitions:
/// - Closed --open()--> Open
/// - Open --read()--> Open
/// - Open --write()--> Open
/// - Open --close()--> Closed
///
/// Final states: {Closed}
///
/// Violations:
/// - Use-after-close: read()/write() on Closed file
/// - Resource leak: File not Closed at function exit
pub struct FileProtocol;

impl FileProtocol {
    /// Define file protocol
    ///
    /// # Example
    /// ```ignore
    /// let protocol = FileProtocol::define();
    /// assert_eq!(protocol.initial_state(), State::new("Closed"));
    /// assert!(protocol.can_transition(
    ///     &State::new("Closed"),
    ///     &Action::new("open"),
    ///     &State::new("Open")
    /// ));
    /// ```
    pub fn define() -> Protocol {
        let mut protocol = Protocol::new("File");

        let closed = State::new("Closed");
        let open = State::new("Open");

        protocol.set_initial_state(closed.clone());
        protocol.add_final_state(closed.clone());

        // Transitions
        protocol.add_transition(closed.clone(), Action::new("open"), open.clone());
        protocol.add_transition(open.clone(), Action::new("read"), open.clone());
        protocol.add_transition(open.clone(), Action::new("write"), open.clone());
        protocol.add_transition(open.clone(), Action::new("readline"), open.clone());
        protocol.add_transition(open.clone(), Action::new("readlines"), open.clone());
        protocol.add_transition(open.clone(), Action::new("writelines"), open.clone());
        protocol.add_transition(open.clone(), Action::new("seek"), open.clone());
        protocol.add_transition(open.clone(), Action::new("tell"), open.clone());
        protocol.add_transition(open.clone(), Action::new("flush"), open.clone());
        protocol.add_transition(open.clone(), Action::new("close"), closed.clone());

        // Preconditions
        protocol.add_precondition(Action::new("read"), open.clone());
        protocol.add_precondition(Action::new("write"), open.clone());
        protocol.add_precondition(Action::new("readline"), open.clone());
        protocol.add_precondition(Action::new("readlines"), open.clone());
        protocol.add_precondition(Action::new("writelines"), open.clone());
        protocol.add_precondition(Action::new("seek"), open.clone());
        protocol.add_precondition(Action::new("tell"), open.clone());
        protocol.add_precondition(Action::new("flush"), open.clone());

        protocol
    }
}

/// Lock protocol
///
/// States: Unlocked ⇄ Locked
///
/// Transitions:
/// - Unlocked --acquire()--> Locked
/// - Locked --release()--> Unlocked
///
/// Final states: {Unlocked}
///
/// Violations:
/// - Double acquire: acquire() on Locked lock (deadlock risk)
/// - Double release: release() on Unlocked lock
/// - Resource leak: Lock not Unlocked at function exit
pub struct LockProtocol;

impl LockProtocol {
    /// Define lock protocol
    ///
    /// # Example
    /// ```ignore
    /// let protocol = LockProtocol::define();
    /// assert_eq!(protocol.initial_state(), State::new("Unlocked"));
    /// assert!(protocol.can_transition(
    ///     &State::new("Unlocked"),
    ///     &Action::new("acquire"),
    ///     &State::new("Locked")
    /// ));
    /// ```
    pub fn define() -> Protocol {
        let mut protocol = Protocol::new("Lock");

        let unlocked = State::new("Unlocked");
        let locked = State::new("Locked");

        protocol.set_initial_state(unlocked.clone());
        protocol.add_final_state(unlocked.clone()); // Must release before exit

        // Transitions
        protocol.add_transition(unlocked.clone(), Action::new("acquire"), locked.clone());
        protocol.add_transition(locked.clone(), Action::new("release"), unlocked.clone());
        protocol.add_transition(locked.clone(), Action::new("__enter__"), locked.clone()); // Python context manager
        protocol.add_transition(locked.clone(), Action::new("__exit__"), unlocked.clone()); // Python context manager

        // Preconditions
        protocol.add_precondition(Action::new("release"), locked.clone());

        protocol
    }
}

/// Connection protocol
///
/// States: Disconnected → Connected → Authenticated → Disconnected
///
/// Transitions:
/// - Disconnected --connect()--> Connected
/// - Connected --authenticate()--> Authenticated
/// - Authenticated --send()--> Authenticated
/// - Authenticated --receive()--> Authenticated
/// - Authenticated --disconnect()--> Disconnected
/// - Connected --disconnect()--> Disconnected
///
/// Final states: {Disconnected}
///
/// Violations:
/// - Protocol violation: send()/receive() before authenticate()
/// - Resource leak: Connection not Disconnected at function exit
pub struct ConnectionProtocol;

impl ConnectionProtocol {
    /// Define connection protocol
    ///
    /// # Example
    /// ```ignore
    /// let protocol = ConnectionProtocol::define();
    /// assert_eq!(protocol.initial_state(), State::new("Disconnected"));
    /// assert!(protocol.can_transition(
    ///     &State::new("Connected"),
    ///     &Action::new("authenticate"),
    ///     &State::new("Authenticated")
    /// ));
    /// ```
    pub fn define() -> Protocol {
        let mut protocol = Protocol::new("Connection");

        let disconnected = State::new("Disconnected");
        let connected = State::new("Connected");
        let authenticated = State::new("Authenticated");

        protocol.set_initial_state(disconnected.clone());
        protocol.add_final_state(disconnected.clone());

        // Transitions
        protocol.add_transition(
            disconnected.clone(),
            Action::new("connect"),
            connected.clone(),
        );
        protocol.add_transition(
            connected.clone(),
            Action::new("authenticate"),
            authenticated.clone(),
        );
        protocol.add_transition(
            authenticated.clone(),
            Action::new("send"),
            authenticated.clone(),
        );
        protocol.add_transition(
            authenticated.clone(),
            Action::new("receive"),
            authenticated.clone(),
        );
        protocol.add_transition(
            authenticated.clone(),
            Action::new("query"),
            authenticated.clone(),
        );
        protocol.add_transition(
            authenticated.clone(),
            Action::new("execute"),
            authenticated.clone(),
        );
        protocol.add_transition(
            authenticated.clone(),
            Action::new("disconnect"),
            disconnected.clone(),
        );
        protocol.add_transition(
            connected.clone(),
            Action::new("disconnect"),
            disconnected.clone(),
        );

        // Preconditions
        protocol.add_precondition(Action::new("send"), authenticated.clone());
        protocol.add_precondition(Action::new("receive"), authenticated.clone());
        protocol.add_precondition(Action::new("query"), authenticated.clone());
        protocol.add_precondition(Action::new("execute"), authenticated.clone());

        protocol
    }
}

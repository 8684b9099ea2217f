//! Booking fulfillment workflow: the reservation state machine and the
//! pickup code handed to the patient.

use proptest::prelude::*;

use pharmahub::models::bookings::BookingStatus;
use pharmahub::services::booking_service::generate_pickup_code;

use BookingStatus::*;

const ALL: [BookingStatus; 4] = [Pending, Ready, Completed, Cancelled];

#[test]
fn full_pickup_flow() {
    let mut status = Pending;
    for next in [Ready, Completed] {
        assert!(status.can_transition_to(next));
        status = next;
    }
    assert!(status.is_terminal());
}

#[test]
fn cancellation_flow_from_either_open_state() {
    assert!(Pending.can_transition_to(Cancelled));

    let mut status = Pending;
    assert!(status.can_transition_to(Ready));
    status = Ready;
    assert!(status.can_transition_to(Cancelled));
}

#[test]
fn completed_requires_passing_through_ready() {
    assert!(!Pending.can_transition_to(Completed));
}

#[test]
fn exactly_four_transitions_are_legal() {
    let legal: Vec<_> = ALL
        .iter()
        .flat_map(|&from| ALL.iter().map(move |&to| (from, to)))
        .filter(|&(from, to)| from.can_transition_to(to))
        .collect();

    assert_eq!(
        legal,
        vec![
            (Pending, Ready),
            (Pending, Cancelled),
            (Ready, Completed),
            (Ready, Cancelled),
        ]
    );
}

/// Mirrors the conditional UPDATE every status change goes through: the
/// row only moves if it still holds the status the caller read.
struct BookingRow {
    status: BookingStatus,
}

impl BookingRow {
    fn transition(&mut self, from: BookingStatus, to: BookingStatus) -> bool {
        if self.status == from && from.can_transition_to(to) {
            self.status = to;
            true
        } else {
            false
        }
    }
}

#[test]
fn stale_cancel_cannot_overwrite_a_completed_pickup() {
    let mut row = BookingRow { status: Ready };

    // The patient reads READY and decides to cancel; the pharmacy
    // completes the pickup first.
    let read = row.status;
    assert!(row.transition(Ready, Completed));

    // The cancel is conditioned on the status that was read, so it no
    // longer applies and the terminal state stands.
    assert!(!row.transition(read, Cancelled));
    assert_eq!(row.status, Completed);
}

#[test]
fn racing_owner_transitions_cannot_both_apply() {
    let mut row = BookingRow { status: Pending };

    let read = row.status;
    assert!(row.transition(read, Ready));
    assert!(!row.transition(read, Cancelled));
    assert_eq!(row.status, Ready);
}

proptest! {
    /// Once a booking reaches a terminal state, no sequence of attempted
    /// transitions can move it again.
    #[test]
    fn terminal_states_are_sticky(attempts in prop::collection::vec(0..4usize, 1..20)) {
        for terminal in [Completed, Cancelled] {
            let mut status = terminal;
            for i in &attempts {
                let next = ALL[*i];
                if status.can_transition_to(next) {
                    status = next;
                }
            }
            prop_assert_eq!(status, terminal);
        }
    }

    /// Any walk through legal transitions that leaves PENDING can never
    /// return to PENDING.
    #[test]
    fn pending_is_never_reentered(attempts in prop::collection::vec(0..4usize, 1..20)) {
        let mut status = Pending;
        let mut left_pending = false;
        for i in &attempts {
            let next = ALL[*i];
            if status.can_transition_to(next) {
                status = next;
                left_pending = true;
            }
            if left_pending {
                prop_assert_ne!(status, Pending);
            }
        }
    }
}

#[test]
fn pickup_codes_are_short_and_human_enterable() {
    for _ in 0..200 {
        let code = generate_pickup_code();
        assert_eq!(code.len(), 6);
        assert_eq!(code, code.to_uppercase());
        assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
    }
}

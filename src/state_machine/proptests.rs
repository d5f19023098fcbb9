//! Property-based tests for the conversation store
//!
//! These tests verify key invariants hold across all possible inputs.

use super::*;
use crate::clock::FixedClock;
use crate::config::ChatConfig;
use crate::controller::{ChatController, Effect};
use crate::topics::TopicTable;
use crate::validation::{is_au_phone, validate_contact};
use chrono::NaiveDate;
use proptest::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;

// ============================================================================
// Test Helpers
// ============================================================================

fn seed() -> ConversationState {
    ConversationState::seed(MessageStamp::new("9:00 AM"))
}

fn controller() -> ChatController<FixedClock> {
    let clock = FixedClock(
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap(),
    );
    let topics = Arc::new(TopicTable::builtin().unwrap());
    ChatController::new(topics, clock, &ChatConfig::default())
}

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_text() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9@.+ ]{0,30}"
}

fn arb_stamp() -> impl Strategy<Value = MessageStamp> {
    (1u32..13, 0u32..60).prop_map(|(h, m)| MessageStamp::new(format!("{h}:{m:02} PM")))
}

fn arb_action() -> impl Strategy<Value = Action> {
    prop_oneof![
        arb_text().prop_map(|text| Action::SetNameDraft { text }),
        arb_text().prop_map(|name| Action::CommitName { name }),
        arb_text().prop_map(|text| Action::SetContactDraft { text }),
        arb_text().prop_map(|contact| Action::CommitContact { contact }),
        (arb_text(), arb_stamp()).prop_map(|(text, stamp)| Action::AppendUserMessage { text, stamp }),
        (arb_text(), arb_stamp()).prop_map(|(text, stamp)| Action::AppendBotMessage { text, stamp }),
        any::<bool>().prop_map(|typing| Action::SetTyping { typing }),
        arb_stamp().prop_map(|stamp| Action::Reset { stamp }),
        Just(Action::Unknown),
    ]
}

fn arb_state() -> impl Strategy<Value = ConversationState> {
    proptest::collection::vec(arb_action(), 0..15)
        .prop_map(|actions| actions.into_iter().fold(seed(), |s, a| reduce(&s, a)))
}

/// Visitor operations against the controller
#[derive(Debug, Clone)]
enum Op {
    Name(String),
    Contact(String),
    Topic(String),
    Chat(String),
    Deliver,
    Reset,
}

fn arb_topic_id() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("pricing".to_string()),
        Just("security".to_string()),
        Just("fallback".to_string()),
        "[a-z-]{1,12}",
    ]
}

fn arb_contact() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("alex@x.com".to_string()),
        Just("0412345678".to_string()),
        Just("+61412345678".to_string()),
        arb_text(),
    ]
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        arb_text().prop_map(Op::Name),
        arb_contact().prop_map(Op::Contact),
        arb_topic_id().prop_map(Op::Topic),
        arb_text().prop_map(Op::Chat),
        Just(Op::Deliver),
        Just(Op::Reset),
    ]
}

/// A decimal digit from a script other than ASCII
fn arb_foreign_digit() -> impl Strategy<Value = char> {
    prop_oneof![
        0x0660u32..0x066A, // Arabic-Indic
        0x0966u32..0x0970, // Devanagari
        0xFF10u32..0xFF1A, // full-width
    ]
    .prop_map(|code| char::from_u32(code).unwrap())
}

fn stage_rank(stage: LeadStage) -> u8 {
    match stage {
        LeadStage::AwaitingName => 0,
        LeadStage::AwaitingContact => 1,
        LeadStage::Active => 2,
    }
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    // Invariant 1: reduction never touches its input
    #[test]
    fn prop_reduce_leaves_input_untouched(state in arb_state(), action in arb_action()) {
        let snapshot = state.clone();
        let _ = reduce(&state, action);
        prop_assert_eq!(state, snapshot);
    }

    // Invariant 2: reset from anywhere yields exactly the seed state
    #[test]
    fn prop_reset_returns_seed(state in arb_state(), stamp in arb_stamp()) {
        let next = reduce(&state, Action::Reset { stamp: stamp.clone() });
        prop_assert_eq!(next, ConversationState::seed(stamp));
    }

    // Invariant 3: appends only ever add to the end
    #[test]
    fn prop_append_keeps_prefix(state in arb_state(), text in arb_text(), stamp in arb_stamp()) {
        let next = reduce(&state, Action::AppendBotMessage { text: text.clone(), stamp });
        prop_assert_eq!(next.messages.len(), state.messages.len() + 1);
        prop_assert_eq!(&next.messages[..state.messages.len()], &state.messages[..]);
        prop_assert_eq!(&next.last_message().unwrap().text, &text);
    }

    // Invariant 4: unknown actions are a no-op
    #[test]
    fn prop_unknown_is_noop(state in arb_state()) {
        prop_assert_eq!(reduce(&state, Action::Unknown), state);
    }

    // Invariant 5: captured values are set once
    #[test]
    fn prop_capture_is_set_once(first in arb_text(), second in arb_text()) {
        let state = reduce(&seed(), Action::CommitName { name: first.clone() });
        let state = reduce(&state, Action::CommitName { name: second });
        prop_assert_eq!(state.captured_name, Some(first));
    }

    // Invariant 6: through the controller, the lead stage only moves forward
    // (except on reset), message ids stay unique and typing ends once every
    // scheduled reply has been delivered
    #[test]
    fn prop_controller_flow(ops in proptest::collection::vec(arb_op(), 0..30)) {
        let mut ctrl = controller();
        let mut pending = Vec::new();

        for op in ops {
            let before = ctrl.state().clone();
            let resetting = matches!(op, Op::Reset);
            let effects = match op {
                Op::Name(text) => ctrl.submit_name(&text),
                Op::Contact(text) => ctrl.submit_contact(&text),
                Op::Topic(id) => ctrl.select_topic(&id),
                Op::Chat(text) => ctrl.send_freeform_message(&text),
                Op::Deliver => pending.drain(..).flat_map(|r| ctrl.complete_reply(r)).collect(),
                Op::Reset => ctrl.reset(),
            };

            for effect in effects {
                if let Effect::ScheduleReply { reply, .. } = effect {
                    pending.push(reply);
                }
            }

            let state = ctrl.state();
            if !resetting {
                prop_assert!(stage_rank(state.lead_stage) >= stage_rank(before.lead_stage));
            }

            let ids: HashSet<_> = state.messages.iter().map(|m| m.id).collect();
            prop_assert_eq!(ids.len(), state.messages.len());
        }

        for reply in pending {
            ctrl.complete_reply(reply);
        }
        prop_assert!(!ctrl.state().is_typing);
    }

    // Invariant 7: well-formed Australian numbers validate, with or without spacing
    #[test]
    fn prop_au_numbers_validate(
        prefix in prop_oneof![Just(""), Just("0"), Just("+61")],
        lead in prop_oneof![Just('2'), Just('3'), Just('4'), Just('7'), Just('8')],
        rest in "[0-9]{8}",
        spaced in any::<bool>(),
    ) {
        let number = if spaced {
            let (head, tail) = rest.split_at(4);
            format!("{prefix}{lead} {head} {tail}")
        } else {
            format!("{prefix}{lead}{rest}")
        };
        prop_assert!(is_au_phone(&number), "{} should validate", number);
        prop_assert!(validate_contact(&number).is_ok());
    }

    // Invariant 8: one digit from another script spoils an otherwise valid number
    #[test]
    fn prop_foreign_digits_rejected(
        prefix in prop_oneof![Just(""), Just("0"), Just("+61")],
        rest in "[0-9]{8}",
        position in 0usize..8,
        foreign in arb_foreign_digit(),
    ) {
        let mut digits: Vec<char> = rest.chars().collect();
        digits[position] = foreign;
        let number = format!("{prefix}4{}", digits.into_iter().collect::<String>());
        prop_assert!(!is_au_phone(&number), "{} should be rejected", number);
        prop_assert!(validate_contact(&number).is_err());
    }

    // Invariant 9: anything without an @ or enough digits is rejected
    #[test]
    fn prop_letters_only_rejected(input in "[a-zA-Z -]{1,30}") {
        prop_assert!(validate_contact(&input).is_err());
    }
}

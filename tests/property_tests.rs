//! Property tests for the conversation memory invariants

use proptest::prelude::*;

use parrot::llm::Message;
use parrot::memory::ConversationMemory;

proptest! {
    // For any sequence of appends, a user's window never exceeds the
    // bound and holds exactly the most recent appends in arrival order.
    #[test]
    fn test_window_holds_last_w_in_order(
        window in 1..=12usize,
        contents in prop::collection::vec("[a-z]{1,8}", 0..40),
    ) {
        let memory = ConversationMemory::with_limits(window, 16);

        for (i, content) in contents.iter().enumerate() {
            memory.append(1, Message::user(content));
            prop_assert!(memory.window(1).len() <= window.min(i + 1),
                "window grew past the bound mid-sequence");
        }

        let expected: Vec<&String> = contents
            .iter()
            .rev()
            .take(window)
            .rev()
            .collect();

        let got = memory.window(1);
        prop_assert_eq!(got.len(), expected.len());
        for (msg, content) in got.iter().zip(expected) {
            prop_assert_eq!(&msg.content, content);
        }
    }

    // Interleaved appends across users never leak between windows.
    #[test]
    fn test_appends_are_isolated_per_user(
        window in 1..=8usize,
        appends in prop::collection::vec((0..4i64, "[a-z]{1,6}"), 0..60),
    ) {
        let memory = ConversationMemory::with_limits(window, 16);

        for (user_id, content) in &appends {
            // Tag the content with its owner so leaks are detectable
            memory.append(*user_id, Message::user(format!("{}:{}", user_id, content)));
        }

        for user_id in 0..4i64 {
            let prefix = format!("{}:", user_id);
            for msg in memory.window(user_id) {
                prop_assert!(msg.content.starts_with(&prefix),
                    "user {} window held foreign message {:?}", user_id, msg.content);
            }

            let own: Vec<_> = appends
                .iter()
                .filter(|(id, _)| *id == user_id)
                .collect();
            let expected = own.len().min(window);
            prop_assert_eq!(memory.window(user_id).len(), expected);
        }
    }

    // The user cap holds no matter how many distinct users appear.
    #[test]
    fn test_tracked_users_never_exceed_cap(
        cap in 1..=8usize,
        user_ids in prop::collection::vec(0..50i64, 1..100),
    ) {
        let memory = ConversationMemory::with_limits(4, cap);

        for user_id in &user_ids {
            memory.append(*user_id, Message::user("hi"));
        }

        let tracked = (0..50i64)
            .filter(|id| !memory.window(*id).is_empty())
            .count();
        prop_assert!(tracked <= cap, "{} tracked users exceed cap {}", tracked, cap);

        // The most recent sender is never the one evicted
        let last = *user_ids.last().unwrap();
        prop_assert!(!memory.window(last).is_empty());
    }
}

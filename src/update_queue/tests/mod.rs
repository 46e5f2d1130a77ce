//! UpdateQueue 单元测试
//!
//! 覆盖优先级跳过、重基、回调与捕获更新

use std::cell::RefCell;
use std::rc::Rc;

use super::*;
use crate::fiber::{FiberRoot, FiberTag, ModeFlags};
use crate::host::HostNodeId;
use crate::util::config::ReconcilerConfig;
use crate::value::Function;

/// ReplaceState payload that appends `text` to a string state.
fn append(text: &str) -> Function {
    let text = text.to_string();
    Function::new("append", move |args: &[Value]| {
        let prev = args.first().and_then(Value::as_str).unwrap_or("").to_string();
        Value::from(format!("{}{}", prev, text))
    })
}

fn append_update(
    priority: u32,
    text: &str,
) -> UpdateRef {
    Update::new(ExpirationTime::new(priority))
        .with_tag(UpdateTag::ReplaceState)
        .with_payload(append(text))
        .into_ref()
}

fn captured_update(
    priority: u32,
    text: &str,
) -> UpdateRef {
    Update::new(ExpirationTime::new(priority))
        .with_tag(UpdateTag::CaptureUpdate)
        .with_payload(append(text))
        .into_ref()
}

fn queue_of(
    arena: &FiberArena,
    wip: FiberId,
) -> QueueRef {
    arena.get(wip).unwrap().update_queue().cloned().unwrap()
}

fn recording_callback(
    log: &Rc<RefCell<Vec<String>>>,
    label: &str,
) -> Function {
    let log = Rc::clone(log);
    let label = label.to_string();
    Function::new(label.clone(), move |_: &[Value]| {
        log.borrow_mut().push(label.clone());
        Value::Null
    })
}

fn new_root(base: Value) -> (FiberArena, FiberRoot) {
    let mut arena = FiberArena::new();
    let root = FiberRoot::new(&mut arena, HostNodeId(0), &ReconcilerConfig::default());
    arena.get_mut(root.current()).unwrap().set_memoized_state(base);
    (arena, root)
}

/// Run one pass at `priority`; returns (state, base state, remaining).
fn render(
    arena: &mut FiberArena,
    root: &mut FiberRoot,
    priority: u32,
    state: &mut ProcessState,
) -> (FiberId, Value, Value, ExpirationTime) {
    let priority = ExpirationTime::new(priority);
    let wip = root.create_work_in_progress(arena, priority).unwrap();
    process_update_queue(arena, wip, &Value::Null, &Value::Null, priority, state).unwrap();
    let fiber = arena.get(wip).unwrap();
    let base = fiber
        .update_queue()
        .map(|q| q.borrow().base_state().clone())
        .unwrap_or(Value::Null);
    (wip, fiber.memoized_state().clone(), base, fiber.expiration_time())
}

fn commit(
    arena: &mut FiberArena,
    root: &mut FiberRoot,
    wip: FiberId,
) -> usize {
    let queue = arena.get(wip).unwrap().update_queue().cloned();
    let fired = match queue {
        Some(queue) => commit_update_queue(arena, wip, &queue, &Value::Null).unwrap(),
        None => 0,
    };
    root.commit(wip);
    fired
}

#[cfg(test)]
mod enqueue_tests {
    use super::*;

    #[test]
    fn test_enqueue_creates_queue_from_memoized_state() {
        let (mut arena, root) = new_root(Value::from("base"));
        enqueue_update(&mut arena, root.current(), append_update(1, "A")).unwrap();

        let queue = arena.get(root.current()).unwrap().update_queue().cloned().unwrap();
        let queue = queue.borrow();
        assert_eq!(queue.base_state(), &Value::from("base"));
        assert_eq!(queue.updates().len(), 1);
        assert!(!queue.is_empty());
    }

    #[test]
    fn test_both_buffers_see_each_update_once() {
        let (mut arena, mut root) = new_root(Value::from(""));
        enqueue_update(&mut arena, root.current(), append_update(1, "A")).unwrap();
        let wip = root.create_work_in_progress(&mut arena, ExpirationTime::NEVER).unwrap();
        // Distinct queue objects sharing one record list.
        let shared = arena.get(wip).unwrap().update_queue().cloned().unwrap();
        ensure_work_in_progress_queue_is_a_clone(&mut arena, wip, shared).unwrap();

        enqueue_update(&mut arena, root.current(), append_update(1, "B")).unwrap();
        enqueue_update(&mut arena, wip, append_update(1, "C")).unwrap();

        let current_queue = arena.get(root.current()).unwrap().update_queue().cloned().unwrap();
        let wip_queue = arena.get(wip).unwrap().update_queue().cloned().unwrap();
        assert!(!Rc::ptr_eq(&current_queue, &wip_queue));

        let current_updates = current_queue.borrow().updates();
        let wip_updates = wip_queue.borrow().updates();
        assert_eq!(current_updates.len(), 3);
        assert_eq!(wip_updates.len(), 3);
        for (a, b) in current_updates.iter().zip(wip_updates.iter()) {
            assert!(Rc::ptr_eq(a, b));
        }
    }

    #[test]
    fn test_alternate_without_queue_gets_shallow_clone() {
        let (mut arena, mut root) = new_root(Value::Null);
        let wip = root.create_work_in_progress(&mut arena, ExpirationTime::SYNC).unwrap();
        assert!(arena.get(wip).unwrap().update_queue().is_none());

        enqueue_update(&mut arena, root.current(), append_update(1, "A")).unwrap();
        let current_queue = arena.get(root.current()).unwrap().update_queue().cloned().unwrap();
        let wip_queue = arena.get(wip).unwrap().update_queue().cloned().unwrap();
        assert!(!Rc::ptr_eq(&current_queue, &wip_queue));
        assert_eq!(wip_queue.borrow().updates().len(), 1);
    }

    #[test]
    fn test_captured_updates_stay_on_work_in_progress() {
        let (mut arena, mut root) = new_root(Value::empty_map());
        enqueue_update(&mut arena, root.current(), Update::new(ExpirationTime::SYNC).into_ref()).unwrap();
        let wip = root.create_work_in_progress(&mut arena, ExpirationTime::SYNC).unwrap();

        let captured = Update::new(ExpirationTime::SYNC)
            .with_tag(UpdateTag::CaptureUpdate)
            .with_payload(Value::map([("error", Value::from("boom"))]))
            .into_ref();
        enqueue_captured_update(&mut arena, wip, captured).unwrap();

        let current_queue = arena.get(root.current()).unwrap().update_queue().cloned().unwrap();
        let wip_queue = arena.get(wip).unwrap().update_queue().cloned().unwrap();
        assert!(current_queue.borrow().captured_updates().is_empty());
        assert_eq!(wip_queue.borrow().captured_updates().len(), 1);
        assert!(wip_queue.borrow().first_captured_update().is_some());
    }

    #[test]
    #[should_panic(expected = "mutated while shared")]
    fn test_shared_queue_mutation_is_caught() {
        let mut config = ReconcilerConfig::default();
        config.debug.assert_queue_clones = true;
        let mut arena = FiberArena::from_config(&config);
        let current = arena.create_fiber(FiberTag::ClassComponent, Value::Null, None, ModeFlags::NO_CONTEXT);
        enqueue_update(&mut arena, current, append_update(1, "A")).unwrap();
        let wip = arena
            .create_work_in_progress(current, Value::Null, ExpirationTime::SYNC)
            .unwrap();
        let shared = arena.get(wip).unwrap().update_queue().cloned().unwrap();
        assert_not_shared(&arena, wip, &shared).unwrap();
    }
}

#[cfg(test)]
mod process_tests {
    use super::*;

    #[test]
    fn test_skip_and_rebase() {
        let (mut arena, mut root) = new_root(Value::from(""));
        for (priority, text) in [(1, "A"), (2, "B"), (1, "C"), (2, "D")] {
            enqueue_update(&mut arena, root.current(), append_update(priority, text)).unwrap();
        }
        let mut state = ProcessState::new();

        let (wip, result, base, remaining) = render(&mut arena, &mut root, 1, &mut state);
        assert_eq!(result, Value::from("AC"));
        assert_eq!(base, Value::from("A"));
        assert_eq!(remaining, ExpirationTime::new(2));
        commit(&mut arena, &mut root, wip);

        let (_, result, base, remaining) = render(&mut arena, &mut root, 2, &mut state);
        assert_eq!(result, Value::from("ABCD"));
        assert_eq!(base, Value::from("ABCD"));
        assert!(remaining.is_no_work());
    }

    #[test]
    fn test_split_passes_match_single_pass() {
        let updates = [(3, "x"), (1, "y"), (2, "z"), (1, "w")];

        let (mut arena, mut root) = new_root(Value::from(""));
        for (priority, text) in updates {
            enqueue_update(&mut arena, root.current(), append_update(priority, text)).unwrap();
        }
        let mut state = ProcessState::new();
        let (_, all_at_once, _, _) = render(&mut arena, &mut root, 3, &mut state);

        let (mut arena, mut root) = new_root(Value::from(""));
        for (priority, text) in updates {
            enqueue_update(&mut arena, root.current(), append_update(priority, text)).unwrap();
        }
        let mut last = Value::Null;
        for priority in [1, 2, 3] {
            let (wip, result, _, _) = render(&mut arena, &mut root, priority, &mut state);
            commit(&mut arena, &mut root, wip);
            last = result;
        }
        assert_eq!(last, all_at_once);
        assert_eq!(last, Value::from("xyzw"));
    }

    #[test]
    fn test_merge_and_replace() {
        let (mut arena, mut root) = new_root(Value::map([("a", Value::from(1))]));
        let merge = Update::new(ExpirationTime::SYNC)
            .with_payload(Value::map([("b", Value::from(2))]))
            .into_ref();
        let noop = Update::new(ExpirationTime::SYNC).into_ref();
        enqueue_update(&mut arena, root.current(), merge).unwrap();
        enqueue_update(&mut arena, root.current(), noop).unwrap();
        let mut state = ProcessState::new();
        let (wip, result, _, _) = render(&mut arena, &mut root, 1, &mut state);
        assert_eq!(result.get("a"), Some(&Value::from(1)));
        assert_eq!(result.get("b"), Some(&Value::from(2)));
        commit(&mut arena, &mut root, wip);

        let replace = Update::new(ExpirationTime::SYNC)
            .with_tag(UpdateTag::ReplaceState)
            .with_payload(Value::from(7))
            .into_ref();
        enqueue_update(&mut arena, root.current(), replace).unwrap();
        let (_, result, _, _) = render(&mut arena, &mut root, 1, &mut state);
        assert_eq!(result, Value::from(7));
    }

    #[test]
    fn test_function_payload_receives_props() {
        let (mut arena, mut root) = new_root(Value::from(1));
        let payload = Function::new("add", |args: &[Value]| {
            let prev = args[0].as_int().unwrap_or(0);
            let step = args[1].get("step").and_then(Value::as_int).unwrap_or(0);
            Value::from(prev + step)
        });
        let update = Update::new(ExpirationTime::SYNC)
            .with_tag(UpdateTag::ReplaceState)
            .with_payload(payload)
            .into_ref();
        enqueue_update(&mut arena, root.current(), update).unwrap();

        let wip = root.create_work_in_progress(&mut arena, ExpirationTime::SYNC).unwrap();
        let props = Value::map([("step", Value::from(4))]);
        let mut state = ProcessState::new();
        process_update_queue(&mut arena, wip, &props, &Value::Null, ExpirationTime::SYNC, &mut state)
            .unwrap();
        assert_eq!(arena.get(wip).unwrap().memoized_state(), &Value::from(5));
    }

    #[test]
    fn test_force_update_flag() {
        let (mut arena, mut root) = new_root(Value::from("same"));
        let force = Update::new(ExpirationTime::SYNC).with_tag(UpdateTag::ForceUpdate).into_ref();
        enqueue_update(&mut arena, root.current(), force).unwrap();

        let mut state = ProcessState::new();
        let (wip, result, _, _) = render(&mut arena, &mut root, 1, &mut state);
        assert!(state.has_force_update);
        assert_eq!(result, Value::from("same"));
        commit(&mut arena, &mut root, wip);

        render(&mut arena, &mut root, 1, &mut state);
        assert!(!state.has_force_update);

        state.has_force_update = true;
        state.reset();
        assert_eq!(state, ProcessState::default());
    }

    #[test]
    fn test_capture_update_flips_flags() {
        let (mut arena, mut root) = new_root(Value::empty_map());
        let wip = root.create_work_in_progress(&mut arena, ExpirationTime::SYNC).unwrap();
        arena.get_mut(wip).unwrap().insert_effect(SideEffectFlags::SHOULD_CAPTURE);

        let captured = Update::new(ExpirationTime::SYNC)
            .with_tag(UpdateTag::CaptureUpdate)
            .with_payload(Value::map([("error", Value::from("boom"))]))
            .into_ref();
        enqueue_captured_update(&mut arena, wip, captured).unwrap();

        let mut state = ProcessState::new();
        process_update_queue(&mut arena, wip, &Value::Null, &Value::Null, ExpirationTime::SYNC, &mut state)
            .unwrap();
        let fiber = arena.get(wip).unwrap();
        assert!(fiber.effect_tag().contains(SideEffectFlags::DID_CAPTURE));
        assert!(!fiber.effect_tag().contains(SideEffectFlags::SHOULD_CAPTURE));
        assert_eq!(fiber.memoized_state().get("error"), Some(&Value::from("boom")));
    }

    #[test]
    fn test_captured_skip_rebases_when_normal_list_did_not() {
        let (mut arena, mut root) = new_root(Value::from(""));
        enqueue_update(&mut arena, root.current(), append_update(1, "A")).unwrap();
        let wip = root.create_work_in_progress(&mut arena, ExpirationTime::SYNC).unwrap();
        enqueue_captured_update(&mut arena, wip, captured_update(10, "X")).unwrap();
        enqueue_captured_update(&mut arena, wip, captured_update(1, "Y")).unwrap();

        let mut state = ProcessState::new();
        process_update_queue(&mut arena, wip, &Value::Null, &Value::Null, ExpirationTime::SYNC, &mut state)
            .unwrap();

        let fiber = arena.get(wip).unwrap();
        assert_eq!(fiber.memoized_state(), &Value::from("AY"));
        assert_eq!(fiber.expiration_time(), ExpirationTime::new(10));
        let queue = queue_of(&arena, wip);
        let queue = queue.borrow();
        assert_eq!(queue.base_state(), &Value::from("A"));
        assert!(queue.updates().is_empty());
        assert_eq!(queue.captured_updates().len(), 2);
    }

    #[test]
    fn test_captured_skip_keeps_base_from_normal_skip() {
        let (mut arena, mut root) = new_root(Value::from(""));
        for (priority, text) in [(1, "A"), (10, "B"), (1, "C")] {
            enqueue_update(&mut arena, root.current(), append_update(priority, text)).unwrap();
        }
        let wip = root.create_work_in_progress(&mut arena, ExpirationTime::SYNC).unwrap();
        enqueue_captured_update(&mut arena, wip, captured_update(10, "X")).unwrap();
        enqueue_captured_update(&mut arena, wip, captured_update(1, "Y")).unwrap();

        let mut state = ProcessState::new();
        process_update_queue(&mut arena, wip, &Value::Null, &Value::Null, ExpirationTime::SYNC, &mut state)
            .unwrap();

        assert_eq!(arena.get(wip).unwrap().memoized_state(), &Value::from("ACY"));
        let queue = queue_of(&arena, wip);
        let queue = queue.borrow();
        // Rebased at B only; the skipped X does not move it to "AC".
        assert_eq!(queue.base_state(), &Value::from("A"));
        assert_eq!(queue.updates().len(), 2);
        assert_eq!(queue.captured_updates().len(), 2);
    }

    #[test]
    fn test_reprocessing_keeps_effect_list_acyclic() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let (mut arena, mut root) = new_root(Value::from(""));
        enqueue_update(&mut arena, root.current(), append_update(10, "A")).unwrap();
        let update = Update::new(ExpirationTime::SYNC)
            .with_tag(UpdateTag::ReplaceState)
            .with_payload(append("B"))
            .with_callback(recording_callback(&log, "b"))
            .into_ref();
        enqueue_update(&mut arena, root.current(), update).unwrap();

        let wip = root.create_work_in_progress(&mut arena, ExpirationTime::SYNC).unwrap();
        let mut state = ProcessState::new();
        for _ in 0..2 {
            process_update_queue(&mut arena, wip, &Value::Null, &Value::Null, ExpirationTime::SYNC, &mut state)
                .unwrap();
        }
        assert_eq!(arena.get(wip).unwrap().memoized_state(), &Value::from("B"));

        let effects = queue_of(&arena, wip).borrow().effects();
        assert_eq!(effects.len(), 1);
        assert!(effects[0].next_effect().is_none());

        assert_eq!(commit(&mut arena, &mut root, wip), 1);
        assert_eq!(*log.borrow(), vec!["b".to_string()]);
    }

    #[test]
    fn test_without_queue_is_noop() {
        let mut arena = FiberArena::new();
        let fiber = arena.create_fiber(FiberTag::HostComponent, Value::Null, None, ModeFlags::NO_CONTEXT);
        let mut state = ProcessState::new();
        process_update_queue(&mut arena, fiber, &Value::Null, &Value::Null, ExpirationTime::SYNC, &mut state)
            .unwrap();
        assert!(arena.get(fiber).unwrap().memoized_state().is_null());
        assert!(arena.get(fiber).unwrap().expiration_time().is_no_work());
    }

    #[test]
    fn test_callback_sets_effect_flag() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let (mut arena, mut root) = new_root(Value::from(""));
        let update = Update::new(ExpirationTime::SYNC)
            .with_tag(UpdateTag::ReplaceState)
            .with_payload(append("A"))
            .with_callback(recording_callback(&log, "a"))
            .into_ref();
        enqueue_update(&mut arena, root.current(), update).unwrap();

        let mut state = ProcessState::new();
        let (wip, _, _, _) = render(&mut arena, &mut root, 1, &mut state);
        assert!(arena.get(wip).unwrap().effect_tag().contains(SideEffectFlags::CALLBACK));
        let queue = arena.get(wip).unwrap().update_queue().cloned().unwrap();
        assert_eq!(queue.borrow().effects().len(), 1);
        assert!(log.borrow().is_empty());
    }
}

#[cfg(test)]
mod commit_tests {
    use super::*;

    #[test]
    fn test_abandoned_passes_fire_nothing() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let (mut arena, mut root) = new_root(Value::from(""));
        let update = Update::new(ExpirationTime::SYNC)
            .with_tag(UpdateTag::ReplaceState)
            .with_payload(append("A"))
            .with_callback(recording_callback(&log, "a"))
            .into_ref();
        enqueue_update(&mut arena, root.current(), update).unwrap();

        let mut state = ProcessState::new();
        for _ in 0..3 {
            let (_, result, _, _) = render(&mut arena, &mut root, 1, &mut state);
            assert_eq!(result, Value::from("A"));
            root.abandon();
        }
        assert!(log.borrow().is_empty());

        let (wip, _, _, _) = render(&mut arena, &mut root, 1, &mut state);
        assert_eq!(commit(&mut arena, &mut root, wip), 1);
        assert_eq!(*log.borrow(), vec!["a".to_string()]);

        let (wip, _, _, _) = render(&mut arena, &mut root, 1, &mut state);
        assert_eq!(commit(&mut arena, &mut root, wip), 0);
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn test_callbacks_fire_in_order_with_instance() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let (mut arena, mut root) = new_root(Value::from(""));
        for label in ["first", "second"] {
            let seen = Rc::clone(&seen);
            let label = label.to_string();
            let callback = Function::new(label.clone(), move |args: &[Value]| {
                seen.borrow_mut().push((label.clone(), args[0].clone()));
                Value::Null
            });
            let update = Update::new(ExpirationTime::SYNC).with_callback(callback).into_ref();
            enqueue_update(&mut arena, root.current(), update).unwrap();
        }

        let wip = root.create_work_in_progress(&mut arena, ExpirationTime::SYNC).unwrap();
        let mut state = ProcessState::new();
        process_update_queue(&mut arena, wip, &Value::Null, &Value::Null, ExpirationTime::SYNC, &mut state)
            .unwrap();
        let queue = arena.get(wip).unwrap().update_queue().cloned().unwrap();
        let instance = Value::from("instance");
        assert_eq!(commit_update_queue(&arena, wip, &queue, &instance).unwrap(), 2);

        let seen = seen.borrow();
        assert_eq!(seen[0], ("first".to_string(), instance.clone()));
        assert_eq!(seen[1], ("second".to_string(), instance));
        assert!(queue.borrow().effects().is_empty());
    }

    #[test]
    fn test_non_function_callback_is_rejected() {
        let (mut arena, mut root) = new_root(Value::Null);
        let update = Update::new(ExpirationTime::SYNC).with_callback(Value::from(3)).into_ref();
        enqueue_update(&mut arena, root.current(), update).unwrap();

        let mut state = ProcessState::new();
        let (wip, _, _, _) = render(&mut arena, &mut root, 1, &mut state);
        let queue = arena.get(wip).unwrap().update_queue().cloned().unwrap();
        let err = commit_update_queue(&arena, wip, &queue, &Value::Null).unwrap_err();
        assert!(matches!(&err, ReconcileError::InvalidCallback { found } if found == "number"));
        assert!(err.to_string().contains("Expected a function"));
    }

    #[test]
    fn test_leftover_captured_updates_are_spliced() {
        let (mut arena, mut root) = new_root(Value::empty_map());
        let normal = Update::new(ExpirationTime::SYNC)
            .with_payload(Value::map([("a", Value::from(1))]))
            .into_ref();
        enqueue_update(&mut arena, root.current(), normal).unwrap();

        let wip = root.create_work_in_progress(&mut arena, ExpirationTime::SYNC).unwrap();
        let late = Update::new(ExpirationTime::new(10))
            .with_tag(UpdateTag::CaptureUpdate)
            .into_ref();
        enqueue_captured_update(&mut arena, wip, Rc::clone(&late)).unwrap();

        let mut state = ProcessState::new();
        process_update_queue(&mut arena, wip, &Value::Null, &Value::Null, ExpirationTime::SYNC, &mut state)
            .unwrap();
        let fiber = arena.get(wip).unwrap();
        assert!(fiber.effect_tag().contains(SideEffectFlags::CALLBACK));
        assert_eq!(fiber.expiration_time(), ExpirationTime::new(10));

        let queue = fiber.update_queue().cloned().unwrap();
        commit_update_queue(&arena, wip, &queue, &Value::Null).unwrap();
        let queue = queue.borrow();
        let updates = queue.updates();
        assert_eq!(updates.len(), 1);
        assert!(Rc::ptr_eq(&updates[0], &late));
        assert!(queue.captured_updates().is_empty());
        assert_eq!(queue.base_state().get("a"), Some(&Value::from(1)));
    }

    #[test]
    fn test_enqueue_on_previous_buffer_after_splice() {
        // The normal update is either applied or skipped before the splice.
        for normal_priority in [1, 10] {
            let (mut arena, mut root) = new_root(Value::from(""));
            enqueue_update(&mut arena, root.current(), append_update(normal_priority, "A")).unwrap();
            let wip = root.create_work_in_progress(&mut arena, ExpirationTime::SYNC).unwrap();
            enqueue_captured_update(&mut arena, wip, captured_update(10, "X")).unwrap();

            let mut state = ProcessState::new();
            process_update_queue(&mut arena, wip, &Value::Null, &Value::Null, ExpirationTime::SYNC, &mut state)
                .unwrap();
            commit(&mut arena, &mut root, wip);

            let previous = arena.get(root.current()).unwrap().alternate().unwrap();
            enqueue_update(&mut arena, previous, append_update(10, "B")).unwrap();

            let current_queue = queue_of(&arena, root.current());
            let previous_queue = queue_of(&arena, previous);
            let pending = if normal_priority == 1 { 2 } else { 3 };
            assert_eq!(current_queue.borrow().updates().len(), pending);
            assert_eq!(previous_queue.borrow().updates().len(), pending);

            let (_, result, base, remaining) = render(&mut arena, &mut root, 10, &mut state);
            assert_eq!(result, Value::from("AXB"), "normal update at {}", normal_priority);
            assert_eq!(base, Value::from("AXB"));
            assert!(remaining.is_no_work());
        }
    }

    #[test]
    fn test_distinct_tails_each_get_the_update() {
        let (mut arena, mut root) = new_root(Value::from(""));
        enqueue_update(&mut arena, root.current(), append_update(1, "A")).unwrap();
        let mut state = ProcessState::new();
        // Everything applied: the work-in-progress list is empty, the
        // current list still ends at A.
        let (wip, _, _, _) = render(&mut arena, &mut root, 1, &mut state);
        enqueue_update(&mut arena, wip, append_update(1, "B")).unwrap();

        assert_eq!(queue_of(&arena, wip).borrow().updates().len(), 1);
        assert_eq!(queue_of(&arena, root.current()).borrow().updates().len(), 2);
    }
}

//! End-to-end cascades driven frame by frame through a spring system

use springflip::{
    next_threshold, FlipAnimator, FlipData, SpringControls, SpringPreset, SpringState,
    SpringSystem, StaggerConfig, DEFAULT_STAGGER_SPEED,
};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

const FRAME: f32 = 1.0 / 60.0;

type Log = Rc<RefCell<Vec<String>>>;

fn tracked(name: &str, log: &Log) -> FlipData {
    let (activate, end) = (log.clone(), log.clone());
    let (a, e) = (format!("{name} activate"), format!("{name} end"));
    FlipData::new(SpringPreset::NoWobble, |_| Box::new(|_| {}))
        .on_spring_activate(move || activate.borrow_mut().push(a))
        .on_animation_end(move || end.borrow_mut().push(e))
}

fn settle(system: &SpringSystem) {
    for _ in 0..3000 {
        if !system.advance(FRAME) {
            return;
        }
    }
    panic!("springs never came to rest");
}

fn count(log: &Log, entry: &str) -> usize {
    log.borrow().iter().filter(|e| *e == entry).count()
}

#[test]
fn no_op_in_the_middle_is_skipped_by_the_cascade() {
    let system = SpringSystem::new();
    let animator = FlipAnimator::new(system.handle());
    let log = Log::default();

    let (b_activate, b_end) = (log.clone(), log.clone());
    let b = FlipData::no_op()
        .on_spring_activate(move || b_activate.borrow_mut().push("B activate".into()))
        .on_animation_end(move || b_end.borrow_mut().push("B end".into()));
    let group = vec![tracked("A", &log), b, tracked("C", &log)];

    let chain = animator.staggered_springs(group, &StaggerConfig::default(), false);

    assert_eq!(chain.len(), 2);
    assert_eq!(system.spring_count(), 2);
    let (a, c) = (chain.get(0).unwrap(), chain.get(1).unwrap());
    assert_eq!(a.end_value(), Some(1.0));
    assert_eq!(c.state(), SpringState::Idle);
    assert_eq!(*log.borrow(), vec!["B activate", "B end"]);

    let threshold = next_threshold(3);
    assert_eq!(threshold, 0.1);

    let mut crossed = false;
    for _ in 0..60 {
        system.advance(FRAME);
        let value = a.current_value().unwrap();
        if value > threshold {
            assert_eq!(c.end_value(), Some((value * DEFAULT_STAGGER_SPEED).min(1.0)));
            crossed = true;
            break;
        }
        assert_eq!(c.end_value(), Some(0.0));
    }
    assert!(crossed, "leader never crossed the cascade threshold");

    settle(&system);

    for name in ["A", "B", "C"] {
        assert_eq!(count(&log, &format!("{name} activate")), 1);
        assert_eq!(count(&log, &format!("{name} end")), 1);
    }
    assert!(a.is_destroyed());
    assert!(c.is_destroyed());
    assert_eq!(system.spring_count(), 0);
}

#[test]
fn reverse_starts_with_the_last_descriptor() {
    let system = SpringSystem::new();
    let animator = FlipAnimator::new(system.handle());
    let log = Log::default();

    let group = vec![tracked("first", &log), tracked("middle", &log), tracked("last", &log)];
    let chain = animator.staggered_springs(group, &StaggerConfig::new().with_reverse(true), false);

    assert_eq!(chain.get(0).unwrap().end_value(), Some(1.0));
    assert_eq!(system.active_spring_count(), 1);

    system.advance(FRAME);
    assert_eq!(log.borrow().first().map(String::as_str), Some("last activate"));

    settle(&system);
    let activations: Vec<String> = log
        .borrow()
        .iter()
        .filter(|e| e.ends_with("activate"))
        .cloned()
        .collect();
    assert_eq!(activations, vec!["last activate", "middle activate", "first activate"]);
}

#[test]
fn long_cascade_releases_every_spring() {
    let system = SpringSystem::new();
    let animator = FlipAnimator::new(system.handle());

    let activations = Rc::new(RefCell::new(Vec::new()));
    let ends = Rc::new(RefCell::new(HashMap::<usize, u32>::new()));
    let last_values = Rc::new(RefCell::new(HashMap::<usize, f32>::new()));

    let group = (0..12)
        .map(|i| {
            let (activations, ends, values) = (activations.clone(), ends.clone(), last_values.clone());
            FlipData::new(SpringPreset::Gentle, move |_| {
                Box::new(move |spring| {
                    values.borrow_mut().insert(i, spring.value());
                })
            })
            .on_spring_activate(move || activations.borrow_mut().push(i))
            .on_animation_end(move || *ends.borrow_mut().entry(i).or_default() += 1)
        })
        .collect();

    let chain = animator.staggered_springs(group, &StaggerConfig::default(), false);
    assert_eq!(chain.len(), 12);

    settle(&system);

    assert_eq!(*activations.borrow(), (0..12).collect::<Vec<_>>());
    for i in 0..12 {
        assert_eq!(ends.borrow().get(&i), Some(&1), "descriptor {i}");
        assert_eq!(last_values.borrow().get(&i), Some(&1.0), "descriptor {i}");
    }
    assert_eq!(system.spring_count(), 0);
    assert!(chain.to_vec().iter().all(|spring| spring.is_destroyed()));
}

#[test]
fn faster_speed_pulls_followers_harder() {
    let system = SpringSystem::new();
    let animator = FlipAnimator::new(system.handle());
    let log = Log::default();

    let group = vec![tracked("lead", &log), tracked("follow", &log)];
    let config = StaggerConfig::new().with_speed(1.0);
    let chain = animator.staggered_springs(group, &config, false);
    let (lead, follow) = (chain.get(0).unwrap(), chain.get(1).unwrap());

    for _ in 0..60 {
        system.advance(FRAME);
        let value = lead.current_value().unwrap();
        if value > next_threshold(2) {
            assert_eq!(follow.end_value(), Some((value * 2.0).min(1.0)));
            return;
        }
    }
    panic!("leader never crossed the cascade threshold");
}

#[test]
fn gesture_drives_the_cascade_both_ways() {
    let system = SpringSystem::new();
    let animator = FlipAnimator::new(system.handle());
    let log = Log::default();
    let controls: Rc<RefCell<Vec<SpringControls>>> = Rc::default();

    let group = ["a", "b", "c"]
        .into_iter()
        .map(|name| {
            let stash = controls.clone();
            let (activate, end) = (log.clone(), log.clone());
            let (on_a, on_e) = (format!("{name} activate"), format!("{name} end"));
            FlipData::new(SpringPreset::NoWobble, move |c| {
                stash.borrow_mut().push(c);
                Box::new(|_| {})
            })
            .on_spring_activate(move || activate.borrow_mut().push(on_a))
            .on_animation_end(move || end.borrow_mut().push(on_e))
        })
        .collect();

    let chain = animator.staggered_springs(group, &StaggerConfig::default(), true);
    assert_eq!(chain.len(), 3);
    assert_eq!(controls.borrow().len(), 3);
    assert_eq!(system.active_spring_count(), 0);
    assert!(log.borrow().is_empty());

    // Fractional gesture progress keeps the cascade moving forward
    let leader = controls.borrow()[0].clone();
    leader.set_end_value(0.5);
    settle(&system);

    let first = (0.5 * DEFAULT_STAGGER_SPEED).min(1.0);
    let second = (first * DEFAULT_STAGGER_SPEED).min(1.0);
    assert_eq!(chain.get(0).unwrap().current_value(), Some(0.5));
    assert_eq!(chain.get(1).unwrap().current_value(), Some(first));
    assert_eq!(chain.get(2).unwrap().current_value(), Some(second));

    // Resting gesture springs stay alive
    assert_eq!(system.spring_count(), 3);
    for name in ["a", "b", "c"] {
        assert_eq!(count(&log, &format!("{name} activate")), 1);
        assert_eq!(count(&log, &format!("{name} end")), 0);
    }

    // Releasing toward 0 flips the cascade backward
    leader.set_end_value(0.0);
    settle(&system);
    for spring in chain.to_vec() {
        assert_eq!(spring.current_value(), Some(0.0));
    }

    // Whoever ends the gesture releases the springs
    for c in controls.borrow().iter() {
        assert!(c.stop());
        c.on_animation_end();
        c.on_animation_end();
    }
    assert_eq!(system.spring_count(), 0);
    for name in ["a", "b", "c"] {
        assert_eq!(count(&log, &format!("{name} activate")), 1);
        assert_eq!(count(&log, &format!("{name} end")), 1);
    }
}

#[test]
fn empty_group_twice_is_silent() {
    let system = SpringSystem::new();
    let animator = FlipAnimator::new(system.handle());

    for _ in 0..2 {
        let chain = animator.staggered_springs(Vec::new(), &StaggerConfig::new().with_reverse(true), true);
        assert!(chain.is_empty());
    }
    assert_eq!(system.spring_count(), 0);
    assert!(!system.has_active_springs());
}

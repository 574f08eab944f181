//! Cascade Demo
//!
//! Runs a staggered list and a couple of standalone elements through a spring
//! system at a fixed 60fps step and logs each element's progress.
//!
//! Run with: RUST_LOG=debug cargo run -p springflip --example cascade

use anyhow::Result;
use springflip::{FlipAnimator, FlipData, FlipSettings, SpringSystem, StaggerGroups};
use std::cell::RefCell;
use std::rc::Rc;

const SETTINGS: &str = r#"
spring = "gentle"

[stagger.list]
speed = 0.6

[stagger.cards]
reverse = true
"#;

fn element(name: String, settings: &FlipSettings, frames: Rc<RefCell<Vec<String>>>) -> FlipData {
    let started = name.clone();
    let finished = name.clone();
    FlipData::new(settings.spring_config(), move |_controls| {
        Box::new(move |spring| {
            frames
                .borrow_mut()
                .push(format!("{name}: {:.3}", spring.value()));
        })
    })
    .on_spring_activate(move || tracing::info!(element = %started, "started"))
    .on_animation_end(move || tracing::info!(element = %finished, "finished"))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let settings = FlipSettings::from_toml_str(SETTINGS)?;
    let system = SpringSystem::new();
    let animator = FlipAnimator::new(system.handle());
    let frames = Rc::new(RefCell::new(Vec::new()));

    let mut groups = StaggerGroups::new();
    groups.push(element("header".into(), &settings, frames.clone()));
    groups.push(FlipData::no_op().on_spring_activate(|| tracing::info!("footer did not move")));
    for i in 0..6 {
        groups.push_staggered("list", element(format!("row-{i}"), &settings, frames.clone()));
    }
    for i in 0..3 {
        groups.push_staggered("cards", element(format!("card-{i}"), &settings, frames.clone()));
    }

    let started = groups.start(&animator, &settings, false);
    tracing::info!(
        individual = started.individual.len(),
        cascades = started.cascades.len(),
        "flips started"
    );

    let mut frame = 0;
    while system.advance(1.0 / 60.0) {
        frame += 1;
        if frame % 10 == 0 {
            for line in frames.borrow_mut().drain(..) {
                tracing::debug!(frame, "{line}");
            }
        }
        frames.borrow_mut().clear();
    }

    tracing::info!(frames = frame, springs = system.spring_count(), "all springs at rest");
    Ok(())
}

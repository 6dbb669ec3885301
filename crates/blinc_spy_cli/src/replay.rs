//! Replaying a scenario against a spy

use anyhow::{Context, Result};
use blinc_spy::{PageLayout, ScrollSpy, SpyEvent, SpyTarget, Viewport};
use tracing::{debug, warn};

use crate::config::{Scenario, Step};

/// Active target after one step
#[derive(Debug, Clone, PartialEq)]
pub struct ReplayLine {
    /// 0 is the initial check, steps count from 1
    pub index: usize,
    pub step: String,
    pub active: Option<String>,
    /// Whether the active target changed on this step
    pub changed: bool,
}

impl std::fmt::Display for ReplayLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let marker = if self.changed { "*" } else { " " };
        write!(
            f,
            "{:>3} {marker} {:<32} {}",
            self.index,
            self.step,
            self.active.as_deref().unwrap_or("-")
        )
    }
}

/// Run every step of a scenario, recording the active target after each
pub fn replay(scenario: &Scenario) -> Result<Vec<ReplayLine>> {
    let page = PageLayout::from_spec(&scenario.page).context("Invalid page description")?;
    let mut spy = ScrollSpy::new(page);

    for target in scenario.spy_targets() {
        spy.add_target(target);
    }
    spy.spy(scenario.spy.clone())
        .context("Invalid spy options")?;

    let mut lines = vec![ReplayLine {
        index: 0,
        step: "start".to_string(),
        active: spy.active_target().map(str::to_string),
        changed: spy.active_target().is_some(),
    }];

    for (i, step) in scenario.steps.iter().enumerate() {
        let before = spy.active_target().map(str::to_string);
        apply(&mut spy, scenario, step).with_context(|| format!("Step {} ({step}) failed", i + 1))?;
        let active = spy.active_target().map(str::to_string);

        debug!(step = %step, active = ?active, "replayed step");
        lines.push(ReplayLine {
            index: i + 1,
            step: step.to_string(),
            changed: active != before,
            active,
        });
    }

    Ok(lines)
}

fn apply(spy: &mut ScrollSpy<PageLayout>, scenario: &Scenario, step: &Step) -> Result<()> {
    match step {
        Step::Scroll { y } => {
            spy.viewport_mut().scroll_window_to(*y);
            spy.handle_event(&SpyEvent::Scroll);
        }
        Step::Resize { height } => {
            spy.viewport_mut().resize_viewport(*height);
            spy.handle_event(&SpyEvent::Resize);
        }
        Step::ContainerScroll { container, y } => {
            spy.viewport_mut().scroll_container_to(container, *y)?;
            spy.handle_event(&SpyEvent::container_scroll(container.clone()));
        }
        Step::Add { name, element } => {
            let element = element.clone().unwrap_or_else(|| name.clone());
            spy.add_target(SpyTarget::new(name.clone(), element));
        }
        Step::Remove { name } => spy.remove_target(name),
        Step::Stop => spy.stop_spying(),
        Step::Spy => spy.spy(scenario.spy.clone())?,
    }
    Ok(())
}

/// Summary of a scenario's consistency
#[derive(Debug, Default)]
pub struct CheckReport {
    pub elements: usize,
    pub targets: usize,
    pub steps: usize,
    /// Target elements and containers that aren't on the page
    pub missing: Vec<String>,
}

/// Validate a scenario without replaying it
pub fn check(scenario: &Scenario) -> Result<CheckReport> {
    let page = PageLayout::from_spec(&scenario.page).context("Invalid page description")?;
    scenario.spy.validate().context("Invalid spy options")?;

    let mut missing = Vec::new();
    if let Some(container) = &scenario.spy.container {
        if !page.contains(container) {
            warn!("Scroll container '{}' is not on the page", container);
            missing.push(container.clone());
        }
    }
    for target in scenario.spy_targets() {
        if !page.contains(&target.element) {
            warn!(
                "Target '{}' points at missing element '{}'",
                target.name, target.element
            );
            missing.push(target.element);
        }
    }
    if scenario.targets.is_empty() {
        warn!("Scenario has no targets, nothing will ever be active");
    }

    Ok(CheckReport {
        elements: page.len(),
        targets: scenario.targets.len(),
        steps: scenario.steps.len(),
        missing,
    })
}

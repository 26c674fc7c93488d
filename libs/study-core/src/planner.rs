//! Daily activity planner.
//!
//! Splits the module catalog evenly over the plan and builds each day's
//! worklist in a fixed order: modules, exercises, mind maps, one flashcard
//! review, one lab, one reflection. Generation is deterministic; the caller
//! persists a day's output as a full replacement of that day's rows.

use std::collections::HashSet;
use std::ops::Range;

use crate::error::Result;
use crate::types::{
    validate_day_number, validate_plan_duration, ActivityType, Catalog, Module, PlannedActivity,
};

/// Category used by the lab activity when a day has no modules.
const GENERIC_LAB_TOPIC: &str = "general practice";

/// Planner bound to one plan duration.
#[derive(Debug, Clone, Copy)]
pub struct ActivityPlanner {
    plan_duration: u32,
}

impl ActivityPlanner {
    pub fn new(plan_duration: u32) -> Result<Self> {
        validate_plan_duration(plan_duration)?;
        Ok(Self { plan_duration })
    }

    pub fn plan_duration(&self) -> u32 {
        self.plan_duration
    }

    /// `ceil(total / duration)`, at least 1.
    pub fn modules_per_day(&self, total_modules: usize) -> usize {
        total_modules
            .div_ceil(self.plan_duration as usize)
            .max(1)
    }

    /// Index range of the catalog assigned to `day_number`.
    ///
    /// The start is clamped to the last module, so days past the end of the
    /// catalog repeat the final module instead of indexing out of range.
    pub fn module_window(&self, day_number: u32, total_modules: usize) -> Range<usize> {
        if total_modules == 0 {
            return 0..0;
        }
        let per_day = self.modules_per_day(total_modules);
        let start = (day_number.saturating_sub(1) as usize)
            .saturating_mul(per_day)
            .min(total_modules - 1);
        let end = (start + per_day).min(total_modules);
        start..end
    }

    /// Number of exercises a day aims for.
    pub fn exercise_quota(&self) -> usize {
        match self.plan_duration {
            0..=30 => 4,
            31..=60 => 3,
            _ => 2,
        }
    }

    /// Upper bound on the flashcard count quoted in the review activity.
    pub fn flashcard_cap(&self) -> usize {
        if self.plan_duration <= 30 {
            10
        } else {
            6
        }
    }

    /// Suggested lab length; longer plans get shorter daily sessions.
    pub fn lab_minutes(&self) -> u32 {
        match self.plan_duration {
            0..=30 => 60,
            31..=60 => 45,
            61..=90 => 30,
            _ => 20,
        }
    }

    /// Build the ordered activity list for one day.
    pub fn generate_day(&self, day_number: u32, catalog: &Catalog) -> Result<Vec<PlannedActivity>> {
        validate_day_number(day_number)?;

        let modules = catalog.modules();
        let today = &modules[self.module_window(day_number, modules.len())];
        let today_ids: HashSet<i64> = today.iter().map(|m| m.id).collect();
        let in_today = |module_id: Option<i64>| module_id.is_some_and(|id| today_ids.contains(&id));

        let mut activities = Vec::new();

        for module in today {
            activities.push(PlannedActivity {
                day_number,
                activity_type: ActivityType::Module,
                activity_id: Some(module.id),
                title: format!("Study: {}", module.title),
                description: format!(
                    "Work through the {} module \"{}\" and take notes on the key ideas.",
                    module.category, module.title
                ),
            });
        }

        let quota = self.exercise_quota();
        let relevant = catalog.exercises().iter().filter(|e| in_today(e.module_id));
        let padding = catalog.exercises().iter().filter(|e| !in_today(e.module_id));
        for exercise in relevant.chain(padding).take(quota) {
            activities.push(PlannedActivity {
                day_number,
                activity_type: ActivityType::Exercise,
                activity_id: Some(exercise.id),
                title: format!("Exercise: {}", exercise.kind),
                description: excerpt(&exercise.prompt, 120),
            });
        }

        for mindmap in catalog.mindmaps().iter().filter(|m| in_today(m.module_id)) {
            activities.push(PlannedActivity {
                day_number,
                activity_type: ActivityType::Mindmap,
                activity_id: Some(mindmap.id),
                title: format!("Mind map: {}", mindmap.title),
                description: "Walk through the mind map and redraw the main branches from memory."
                    .to_string(),
            });
        }

        let relevant_cards = catalog
            .flashcards()
            .iter()
            .filter(|c| in_today(c.module_id))
            .count();
        let flashcard_count = relevant_cards.min(self.flashcard_cap());
        // Day 1 with nothing relevant is the only day without a review slot.
        if flashcard_count > 0 || day_number > 1 {
            let description = if flashcard_count > 0 {
                format!("Review {flashcard_count} flashcards from today's modules plus any cards that are due.")
            } else {
                "Review any flashcards that are due today.".to_string()
            };
            activities.push(PlannedActivity {
                day_number,
                activity_type: ActivityType::Flashcards,
                activity_id: None,
                title: "Flashcard review".to_string(),
                description,
            });
        }

        activities.push(self.lab_activity(day_number, today.first()));

        activities.push(PlannedActivity {
            day_number,
            activity_type: ActivityType::Reflection,
            activity_id: None,
            title: "Daily reflection".to_string(),
            description: "Write down what you learned today, what was hard, and what to revisit."
                .to_string(),
        });

        Ok(activities)
    }

    fn lab_activity(&self, day_number: u32, lead: Option<&Module>) -> PlannedActivity {
        let topic = lead.map_or(GENERIC_LAB_TOPIC, |m| m.category.as_str());
        PlannedActivity {
            day_number,
            activity_type: ActivityType::Lab,
            activity_id: None,
            title: format!("Lab: {topic}"),
            description: format!(
                "Spend {} minutes on a hands-on lab applying {topic}.",
                self.lab_minutes()
            ),
        }
    }
}

/// Generate `day_number` of a `plan_duration`-day plan.
pub fn generate_day(
    day_number: u32,
    plan_duration: u32,
    catalog: &Catalog,
) -> Result<Vec<PlannedActivity>> {
    ActivityPlanner::new(plan_duration)?.generate_day(day_number, catalog)
}

/// A day is complete when it has activities and all of them are done.
pub fn is_day_complete<I>(completed: I) -> bool
where
    I: IntoIterator<Item = bool>,
{
    let mut any = false;
    for done in completed {
        if !done {
            return false;
        }
        any = true;
    }
    any
}

fn excerpt(text: &str, max_chars: usize) -> String {
    let trimmed = text.trim();
    if trimmed.chars().count() <= max_chars {
        return trimmed.to_string();
    }
    let cut: String = trimmed.chars().take(max_chars).collect();
    format!("{}...", cut.trim_end())
}

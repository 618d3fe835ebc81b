//! Plain-text rendering of plans and today's schedule

use std::collections::BTreeSet;

use plano_core::plan::weekday::portuguese_name;
use plano_core::plan::{
    Activity, DayGroup, DayProgress, ExerciseId, Item, Plan, PlanProfile, ScheduledExercise,
    TodayRehab, TodayWorkout,
};

const INDENT: &str = "  ";

fn indent(depth: usize) -> String {
    INDENT.repeat(depth)
}

fn push_day(lines: &mut Vec<String>, day: &DayGroup, depth: usize) {
    let mut header = format!("{}{}", indent(depth), day.label);
    if let Some(kcal) = day.calories {
        header.push_str(&format!(" (~{} kcal)", kcal));
    }
    lines.push(header);
    for meal in &day.meals {
        lines.push(format!("{}{}", indent(depth + 1), meal));
        for food in &meal.foods {
            lines.push(format!("{}- {}", indent(depth + 2), food));
        }
    }
    for note in &day.notes {
        lines.push(format!("{}{}", indent(depth + 1), note));
    }
}

fn push_item(lines: &mut Vec<String>, item: &Item, depth: usize) {
    let pad = indent(depth);
    match item {
        Item::Exercise(exercise) => {
            lines.push(format!("{}• {}", pad, exercise));
            for note in &exercise.notes {
                lines.push(format!("{}{}- {}", pad, INDENT, note));
            }
        }
        Item::Block(block) => {
            match &block.phase {
                Some(phase) => lines.push(format!("{}▸ {} [{}]", pad, block.name, phase)),
                None => lines.push(format!("{}▸ {}", pad, block.name)),
            }
            for detail in &block.details {
                lines.push(format!("{}{}{}", pad, INDENT, detail));
            }
            for note in &block.notes {
                lines.push(format!("{}{}- {}", pad, INDENT, note));
            }
        }
        Item::Day(day) => push_day(lines, day, depth),
        Item::Meal(meal) => {
            lines.push(format!("{}{}", pad, meal));
            for food in &meal.foods {
                lines.push(format!("{}{}- {}", pad, INDENT, food));
            }
        }
        Item::Category(group) => {
            lines.push(format!("{}{}:", pad, group.category));
            for entry in &group.items {
                lines.push(format!("{}{}- {}", pad, INDENT, entry));
            }
        }
        Item::Fact(fact) => lines.push(format!("{}{}", pad, fact)),
        Item::Text(text) => lines.push(format!("{}{}", pad, text)),
    }
}

/// Section-by-section outline of a parsed plan.
pub fn render_plan(plan: &Plan) -> String {
    let mut lines = Vec::new();
    for entry in &plan.sections {
        let section = &entry.section;
        let title = match (section.preamble, section.number) {
            (true, _) => "(introdução)".to_string(),
            (false, Some(number)) => format!("{}. {}", number, section.title),
            (false, None) => section.title.clone(),
        };
        lines.push(format!("== {} [{}]", title, section.section_type));
        for item in &entry.items {
            push_item(&mut lines, item, 1);
        }
        lines.push(String::new());
    }
    lines.join("\n")
}

fn push_scheduled(lines: &mut Vec<String>, exercises: &[ScheduledExercise], done: &BTreeSet<ExerciseId>) {
    for exercise in exercises {
        let mark = if done.contains(&exercise.id) { "x" } else { " " };
        let summary = match &exercise.activity {
            Activity::Exercise(item) => item.to_string(),
            Activity::Block(block) => block.name.clone(),
        };
        let phase = exercise
            .phase
            .as_ref()
            .map(|p| format!(" [{}]", p))
            .unwrap_or_default();
        lines.push(format!("[{}] {}  {}{}", mark, exercise.id, summary, phase));
        if let Activity::Block(block) = &exercise.activity {
            for detail in &block.details {
                lines.push(format!("{}{}", indent(3), detail));
            }
        }
    }
}

fn push_progress(lines: &mut Vec<String>, progress: &DayProgress) {
    if progress.total > 0 {
        lines.push(format!("Progresso: {}/{}", progress.done, progress.total));
    }
}

pub fn render_workout(today: &TodayWorkout, progress: &DayProgress, done: &BTreeSet<ExerciseId>) -> String {
    let mut lines = vec![format!("{} · {}", portuguese_name(today.weekday()), today.title())];
    match today {
        TodayWorkout::Rest { rest, .. } => {
            lines.push(format!("{}{} ({} min)", INDENT, rest.description, rest.duration_minutes));
        }
        TodayWorkout::Planned { exercises, .. } => push_scheduled(&mut lines, exercises, done),
        TodayWorkout::Fallback { exercises, .. } => {
            lines.push(format!("{}(treino sugerido: o plano não detalha este treino)", INDENT));
            push_scheduled(&mut lines, exercises, done);
        }
    }
    push_progress(&mut lines, progress);
    lines.join("\n")
}

pub fn render_rehab(today: &TodayRehab, progress: &DayProgress, done: &BTreeSet<ExerciseId>) -> String {
    let name = portuguese_name(today.day());
    match today {
        TodayRehab::Scheduled { title, exercises, .. } => {
            let mut lines = vec![format!("{} · {}", name, title)];
            push_scheduled(&mut lines, exercises, done);
            push_progress(&mut lines, progress);
            lines.join("\n")
        }
        TodayRehab::NothingScheduled { .. } => {
            format!("{} · Nenhum exercício programado", name)
        }
    }
}

pub fn render_menu(day: Option<&DayGroup>, weekday: chrono::Weekday) -> String {
    match day {
        Some(day) => {
            let mut lines = Vec::new();
            push_day(&mut lines, day, 0);
            lines.join("\n")
        }
        None => format!("{} · Nenhum cardápio para este dia", portuguese_name(weekday)),
    }
}

/// Keyword table of a profile, in match order.
pub fn render_keywords(profile: &PlanProfile) -> String {
    let mut lines = vec![format!("{} ({}):", profile.kind.label(), profile.kind)];
    for rule in profile.keywords.rules() {
        lines.push(format!("{}{:<20} -> {}", INDENT, rule.keyword, rule.section_type));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use plano_core::plan::{resolve_workout, PlanKind, ScheduleOptions};

    #[test]
    fn test_render_plan_outline() {
        let profile = PlanProfile::builtin(PlanKind::Nutrition);
        let plan = Plan::parse(
            "Olá!\n### **1. ANÁLISE**\nPeso: 70kg\n## CARDÁPIO\n#### Segunda-feira\nAlmoço (12:00)\n- Arroz",
            &profile,
        );
        let out = render_plan(&plan);
        assert!(out.contains("== (introdução) [other]"));
        assert!(out.contains("== 1. ANÁLISE [analysis]"));
        assert!(out.contains("  Peso: 70kg"));
        assert!(out.contains("    Almoço (12:00)"));
        assert!(out.contains("      - Arroz"));
    }

    #[test]
    fn test_render_workout_marks_done() {
        let profile = PlanProfile::builtin(PlanKind::Workout);
        let plan = Plan::parse("## TREINO A\n- Supino reto: 3x10\n- Crucifixo: 3x12", &profile);
        let today = resolve_workout(1, &plan.sections(), &profile, &ScheduleOptions::default());
        let done: BTreeSet<_> = [today.exercises()[0].id.clone()].into_iter().collect();
        let progress = DayProgress { done: 1, total: 2 };

        let out = render_workout(&today, &progress, &done);
        assert!(out.starts_with("Segunda-feira · TREINO A"));
        assert!(out.contains("[x] supino-reto-0  Supino reto: 3x10"));
        assert!(out.contains("[ ] crucifixo-1"));
        assert!(out.ends_with("Progresso: 1/2"));
    }

    #[test]
    fn test_render_rest_day() {
        let profile = PlanProfile::builtin(PlanKind::Workout);
        let today = resolve_workout(0, &[], &profile, &ScheduleOptions::default());
        let out = render_workout(&today, &DayProgress { done: 0, total: 0 }, &BTreeSet::new());
        assert!(out.starts_with("Domingo · Dia de Descanso"));
        assert!(!out.contains("Progresso"));
    }

    #[test]
    fn test_render_keywords() {
        let out = render_keywords(&PlanProfile::builtin(PlanKind::Rehabilitation));
        assert!(out.starts_with("Reabilitação (rehabilitation):"));
        assert!(out.contains("-> education"));
    }
}

//! Meal sections: weekday groups, timed meals, foods and calories

use once_cell::sync::Lazy;
use regex::Regex;

use crate::plan::items::{DayGroup, Item, KeyValue, MealItem};
use crate::plan::section::{ContentKind, ContentLine, Section};
use crate::plan::weekday::parse_day_heading;
use crate::text::{fold_lower, strip_leading_number, trim_symbols};

/// `Café da Manhã (07:00)`, `Almoço [12h30]: arroz e feijão`
static MEAL_TIME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?P<name>[^()\[\]]+?)\s*[(\[]\s*(?P<time>\d{1,2}\s*(?::|h)\s*\d{2}|\d{1,2}\s*h)\s*[)\]]\s*:?\s*(?P<rest>.*)$",
    )
    .unwrap()
});

/// `07:00 - Café da Manhã`
static TIME_FIRST_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<time>\d{1,2}\s*(?::|h)\s*\d{2}|\d{1,2}h)\s*[-–:|]\s*(?P<name>.+)$").unwrap()
});

static TIME_PARTS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{1,2})\s*(?::|h)\s*(\d{2})?").unwrap());

/// Meal names recognized without a time, on folded lowercase text
static KNOWN_MEAL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:cafe da manha|desjejum|colacao|lanche(?: da manha| da tarde| da noite)?|almoco|jantar|ceia|pre[- ]?treino|pos[- ]?treino|refeicao \d{1,2}|\d{1,2}a? refeicao)\s*(?:$|[:\-–(])",
    )
    .unwrap()
});

static KCAL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d{1,5}(?:[.,]\d{1,2})?)\s*kcal").unwrap());

/// Words that mark a kcal line as a meal or day total
const SUMMARY_PREFIXES: &[&str] = &[
    "total",
    "calorias",
    "valor calorico",
    "valor energetico",
    "energia",
    "aproximadamente",
    "aprox",
    "~",
];

fn normalize_time(raw: &str) -> String {
    match TIME_PARTS_RE.captures(raw) {
        Some(caps) => {
            let hours: u32 = caps[1].parse().unwrap_or(0);
            let minutes: u32 = caps.get(2).and_then(|m| m.as_str().parse().ok()).unwrap_or(0);
            format!("{:02}:{:02}", hours, minutes)
        }
        None => raw.trim().to_string(),
    }
}

fn clean_meal_name(raw: &str) -> String {
    trim_symbols(strip_leading_number(trim_symbols(raw))).to_string()
}

/// A meal opened by this line: `(name, time, inline foods)`.
fn parse_meal_opener(text: &str) -> Option<(String, Option<String>, Option<String>)> {
    if let Some(caps) = MEAL_TIME_RE.captures(text) {
        let name = clean_meal_name(&caps["name"]);
        if !name.is_empty() {
            let rest = trim_symbols(&caps["rest"]);
            let foods = (!rest.is_empty()).then(|| rest.to_string());
            return Some((name, Some(normalize_time(&caps["time"])), foods));
        }
    }

    if let Some(caps) = TIME_FIRST_RE.captures(text) {
        let name = clean_meal_name(&caps["name"]);
        if KNOWN_MEAL_RE.is_match(&fold_lower(&name)) {
            return Some((name, Some(normalize_time(&caps["time"])), None));
        }
    }

    let stripped = trim_symbols(strip_leading_number(trim_symbols(text)));
    let folded = fold_lower(stripped);
    if KNOWN_MEAL_RE.is_match(&folded) {
        // split "Almoço: arroz e feijão" at the first separator after the name
        let (name, rest) = match stripped.find([':', '–']).or_else(|| stripped.find(" - ")) {
            Some(at) => (&stripped[..at], &stripped[at..]),
            None => (stripped, ""),
        };
        let rest = trim_symbols(rest);
        let foods = (!rest.is_empty()).then(|| rest.to_string());
        return Some((trim_symbols(name).to_string(), None, foods));
    }

    None
}

fn kcal_of(text: &str) -> Option<u32> {
    let caps = KCAL_RE.captures(text)?;
    let value: f64 = caps[1].replace(',', ".").parse().ok()?;
    Some(value.round() as u32)
}

/// A kcal line with nothing but a total marker around the number.
fn is_summary(text: &str) -> bool {
    let folded = fold_lower(text);
    let residual = KCAL_RE.replace_all(&folded, "");
    let residual = trim_symbols(residual.trim()).trim_start_matches('(');
    residual.is_empty() || SUMMARY_PREFIXES.iter().any(|p| residual.starts_with(p))
}

fn as_note(line: &ContentLine) -> String {
    match &line.kind {
        ContentKind::KeyValue { label, value } => format!("{}: {}", label, value),
        _ => line.text.clone(),
    }
}

#[derive(Clone, Copy)]
enum MealSlot {
    /// Index into the top-level items
    TopLevel(usize),
    /// Last meal of the open day group
    InDay,
}

struct OpenMeal {
    slot: MealSlot,
    summary: bool,
    food_kcal: u32,
}

#[derive(Default)]
struct MealFolder {
    items: Vec<Item>,
    day: Option<usize>,
    meal: Option<OpenMeal>,
}

impl MealFolder {
    fn day_mut(&mut self) -> Option<&mut DayGroup> {
        match self.day.and_then(|i| self.items.get_mut(i)) {
            Some(Item::Day(day)) => Some(day),
            _ => None,
        }
    }

    fn meal_mut(&mut self) -> Option<&mut MealItem> {
        let slot = self.meal.as_ref()?.slot;
        match slot {
            MealSlot::TopLevel(i) => match self.items.get_mut(i) {
                Some(Item::Meal(meal)) => Some(meal),
                _ => None,
            },
            MealSlot::InDay => self.day_mut().and_then(|day| day.meals.last_mut()),
        }
    }

    fn close_meal(&mut self) {
        let Some(open) = self.meal.as_ref() else {
            return;
        };
        let (summary, food_kcal) = (open.summary, open.food_kcal);
        if !summary && food_kcal > 0 {
            if let Some(meal) = self.meal_mut() {
                meal.calories = Some(food_kcal);
            }
        }
        self.meal = None;
    }

    fn open_day(&mut self, day: chrono::Weekday, label: &str) {
        self.close_meal();
        self.items.push(Item::Day(DayGroup {
            day,
            label: label.to_string(),
            meals: Vec::new(),
            notes: Vec::new(),
            calories: None,
        }));
        self.day = Some(self.items.len() - 1);
    }

    fn open_meal(&mut self, meal: MealItem) {
        self.close_meal();
        let slot = match self.day_mut() {
            Some(day) => {
                day.meals.push(meal);
                MealSlot::InDay
            }
            None => {
                self.items.push(Item::Meal(meal));
                MealSlot::TopLevel(self.items.len() - 1)
            }
        };
        self.meal = Some(OpenMeal {
            slot,
            summary: false,
            food_kcal: 0,
        });
    }

    fn add_food(&mut self, food: &str) {
        let kcal = kcal_of(food).unwrap_or(0);
        if let Some(meal) = self.meal_mut() {
            meal.foods.push(food.to_string());
        }
        if let Some(open) = self.meal.as_mut() {
            open.food_kcal = open.food_kcal.saturating_add(kcal);
        }
    }

    /// Returns false when there is nothing open to hold the total.
    fn set_total(&mut self, kcal: u32) -> bool {
        if let Some(meal) = self.meal_mut() {
            meal.calories = Some(kcal);
            if let Some(open) = self.meal.as_mut() {
                open.summary = true;
            }
            return true;
        }
        if let Some(day) = self.day_mut() {
            day.calories = Some(kcal);
            return true;
        }
        false
    }

    fn note(&mut self, line: &ContentLine) {
        if let Some(day) = self.day_mut() {
            day.notes.push(as_note(line));
            return;
        }
        let item = match &line.kind {
            ContentKind::KeyValue { label, value } => Item::Fact(KeyValue::new(label, value)),
            _ => Item::Text(line.text.clone()),
        };
        self.items.push(item);
    }

    fn finish(mut self) -> Vec<Item> {
        self.close_meal();
        self.items
    }
}

pub(crate) fn format_meals(section: &Section) -> Vec<Item> {
    let mut folder = MealFolder::default();

    for line in &section.content {
        let text = line.text.as_str();

        if let Some(day) = parse_day_heading(text) {
            match &line.kind {
                ContentKind::KeyValue { label, value } => {
                    folder.open_day(day, trim_symbols(label));
                    if let Some(group) = folder.day_mut() {
                        group.notes.push(value.clone());
                    }
                }
                _ => folder.open_day(day, trim_symbols(text)),
            }
            continue;
        }

        if let Some((name, time, inline)) = parse_meal_opener(text) {
            folder.open_meal(MealItem {
                name,
                time,
                foods: Vec::new(),
                calories: None,
            });
            if let Some(food) = inline {
                folder.add_food(&food);
            }
            continue;
        }

        if let Some(kcal) = kcal_of(text) {
            if is_summary(text) && folder.set_total(kcal) {
                continue;
            }
        }

        if line.is_list_item() && folder.meal.is_some() {
            folder.add_food(text);
            continue;
        }

        folder.note(line);
    }

    folder.finish()
}

//! Chat-message formatting for rules records.
//!
//! Pure projections from a loosely-typed [`Record`] to the fixed text
//! layouts the bot replies with. Missing fields render as placeholders
//! rather than failing; the API schema is not enforced here.

use open5e::Record;
use serde_json::Value;

/// Character budget for spell descriptions before truncation.
const DESCRIPTION_BUDGET: usize = 900;

/// Placeholder appended when a description is truncated.
const ELLIPSIS: &str = " …";

/// Format a spell record into the bot's labeled-line layout.
pub fn format_spell(spell: &Record) -> String {
    let name = spell.name().unwrap_or("Unknown Spell");
    let level = spell.int("level").unwrap_or(0);
    let target_type = spell.text("target_type").unwrap_or("Unknown");
    let range = spell.text("range").unwrap_or("Unknown");
    let casting_time = spell.text("casting_time").unwrap_or("Unknown");
    let duration = spell.text("duration").unwrap_or("Unknown");

    // Components: V / S / M -> VSM, VM, SM etc.
    let mut components = String::new();
    if spell.flag("verbal") {
        components.push('V');
    }
    if spell.flag("somatic") {
        components.push('S');
    }
    if spell.flag("material") {
        components.push('M');
    }
    if components.is_empty() {
        components.push_str("None");
    }

    let material_details = if spell.flag("material") {
        let mut parts: Vec<String> = Vec::new();
        if let Some(spec) = spell.text("material_specified") {
            if !spec.trim().is_empty() {
                parts.push(spec.trim().to_string());
            }
        }
        if let Some(cost) = number_or_text(spell, "material_cost") {
            parts.push(format!("Cost: {cost}"));
        }
        if spell.flag("material_consumed") {
            parts.push("Consumed".to_string());
        }

        if parts.is_empty() {
            Some("Requires material components".to_string())
        } else {
            Some(parts.join("; "))
        }
    } else {
        None
    };

    let saving_throw = match spell.text("saving_throw_ability").map(str::trim) {
        Some(ability) if !ability.is_empty() => ability.to_uppercase(),
        _ => "N/A".to_string(),
    };

    let attack_roll = if spell.flag("attack_roll") { "Yes" } else { "N/A" };

    let damage_line = match spell.text("damage_roll").map(str::trim) {
        Some(roll) if !roll.is_empty() => {
            let types = spell.text_list("damage_types");
            if types.is_empty() {
                Some(roll.to_string())
            } else {
                Some(format!("{roll} ({})", types.join(", ")))
            }
        }
        _ => None,
    };

    let shape_line = spell.text("shape_type").map(|shape| {
        match number_or_text(spell, "shape_size") {
            Some(size) => {
                let unit = spell.text("shape_size_unit").unwrap_or("").trim();
                format!("{shape} ({size} {unit})")
            }
            None => shape.to_string(),
        }
    });

    let target_line = match spell.int("target_count") {
        Some(count) => format!("{count} ({target_type})"),
        None => target_type.to_string(),
    };

    let yes_no = |flag: bool| if flag { "Yes" } else { "No" };

    let mut lines = vec![
        format!("**{name}**"),
        format!("Spell Level: {level}"),
        format!("Target Type: {target_type}"),
        format!("Target Count: {target_line}"),
        format!("Range: {range}"),
        format!("Ritual: {}", yes_no(spell.flag("ritual"))),
        format!("Casting Time: {casting_time}"),
        format!("Duration: {duration}"),
        format!("Concentration: {}", yes_no(spell.flag("concentration"))),
        format!("Components: {components}"),
    ];

    if let Some(details) = material_details {
        lines.push(format!("Material Details: {details}"));
    }

    lines.push(format!("Saving Throw: {saving_throw}"));
    lines.push(format!("Attack Roll: {attack_roll}"));

    if let Some(damage) = damage_line {
        lines.push(format!("Damage: {damage}"));
    }

    if let Some(shape) = shape_line {
        lines.push(format!("Shape: {shape}"));
    }

    if let Some(desc) = spell.text("desc") {
        if !desc.is_empty() {
            lines.push(String::new());
            lines.push(shorten(desc, DESCRIPTION_BUDGET, ELLIPSIS));
        }
    }

    lines.join("\n")
}

/// Format a condition record: name plus its full description.
pub fn format_condition(condition: &Record) -> String {
    let name = condition.name().unwrap_or("Unknown Condition");
    let desc = condition.text("desc").unwrap_or("No description available.");
    format!("rules for {name} are: {desc}")
}

/// Format a weapon record: name, damage, range line(s), properties.
///
/// The range lines follow a three-way precedence over the property list:
/// a `range N/M` property plus `thrown` yields a melee line and separate
/// thrown short/long lines; otherwise `ammunition` with a range yields
/// short/long range lines; otherwise `reach` (with no range figures at
/// all) yields a 10 ft melee line; everything else is a plain 5 ft melee
/// weapon.
pub fn format_weapon(weapon: &Record) -> String {
    let name = weapon.name().unwrap_or("Unknown Weapon");
    let properties = weapon.text_list("properties");

    let damage = match (weapon.text("damage_dice"), weapon.text("damage_type")) {
        (Some(dice), Some(damage_type)) => format!("{dice} {damage_type}"),
        (Some(dice), None) => dice.to_string(),
        (None, Some(damage_type)) => damage_type.to_string(),
        (None, None) => "Unknown".to_string(),
    };

    let has = |tag: &str| properties.iter().any(|p| p.trim().eq_ignore_ascii_case(tag));
    let range_figures = properties.iter().find_map(|p| parse_range_property(p));

    let mut lines = vec![format!("**{name}**"), format!("Damage: {damage}")];

    match (range_figures, has("thrown"), has("ammunition"), has("reach")) {
        (Some((short, long)), true, _, _) => {
            lines.push("Melee Range: 5 ft.".to_string());
            lines.push(format!("Thrown Range (short): {short} ft."));
            lines.push(format!("Thrown Range (long): {long} ft."));
        }
        (Some((short, long)), false, true, _) => {
            lines.push(format!("Short Range: {short} ft."));
            lines.push(format!("Long Range: {long} ft."));
        }
        (None, _, _, true) => {
            lines.push("Melee Range: 10 ft.".to_string());
        }
        _ => {
            lines.push("Melee Range: 5 ft.".to_string());
        }
    }

    if properties.is_empty() {
        lines.push("Properties: None".to_string());
    } else {
        lines.push(format!("Properties: {}", properties.join(", ")));
    }

    lines.join("\n")
}

/// Parse a `range <N>/<M>` property, case-insensitively.
fn parse_range_property(property: &str) -> Option<(u32, u32)> {
    let lowered = property.trim().to_lowercase();
    let figures = lowered.strip_prefix("range")?.trim();
    let (short, long) = figures.split_once('/')?;
    Some((short.trim().parse().ok()?, long.trim().parse().ok()?))
}

/// Render a numeric or string field for display.
fn number_or_text(record: &Record, field: &str) -> Option<String> {
    match record.fields().get(field)? {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    }
}

/// Collapse whitespace and truncate to `width` characters on a word
/// boundary, appending `placeholder` when anything was dropped.
fn shorten(text: &str, width: usize, placeholder: &str) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    let collapsed_len: usize = words.iter().map(|w| w.chars().count()).sum::<usize>()
        + words.len().saturating_sub(1);

    if collapsed_len <= width {
        return words.join(" ");
    }

    let budget = width.saturating_sub(placeholder.chars().count());
    let mut kept: Vec<&str> = Vec::new();
    let mut used = 0;

    for word in words {
        let cost = word.chars().count() + if kept.is_empty() { 0 } else { 1 };
        if used + cost > budget {
            break;
        }
        kept.push(word);
        used += cost;
    }

    format!("{}{placeholder}", kept.join(" "))
}

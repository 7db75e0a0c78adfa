//! Non-revealing strategy hints for mathematics items.
//!
//! The hint is derived from the item area and the numbers in its prompt, so
//! the same builder serves freshly generated items and existing ones.

/// Longest number line drawn in a hint.
const MAX_LINE_POINTS: usize = 12;

/// Builds a strategy hint for a mathematics prompt.
///
/// # Example
///
/// ```
/// use question_bank::generator::math_strategy;
///
/// let hint = math_strategy("addition", "38 + 5 =");
/// assert!(hint.starts_with("🎯 Gör en tia"));
/// ```
#[must_use]
pub fn math_strategy(area: &str, prompt: &str) -> String {
    let text = prompt.to_lowercase();
    let numbers = numbers_in(&text);
    let first = numbers.first().copied();
    let second = numbers.get(1).copied();
    let operands = first.zip(second);

    match area.to_lowercase().as_str() {
        "addition" => operands.map_or_else(
            || "🎯 Sikta på tiotal först. Gör 10/20/30 och lägg på resten.".to_owned(),
            |(a, b)| addition_hint(a, b),
        ),
        "subtraktion" => operands.map_or_else(
            || "🎯 Antingen ner till jämn tia först, eller räkna upp från det mindre.".to_owned(),
            |(a, b)| subtraction_hint(a, b),
        ),
        "multiplikation" => operands.map_or_else(
            || "🎯 Upprepad addition eller bryt mot 10: n×m = n×10 − n×(10−m).".to_owned(),
            |(a, b)| multiplication_hint(a, b),
        ),
        "division" => operands.filter(|(_, b)| *b != 0).map_or_else(
            || "🎯 \"Hur många grupper?\". Använd en tabell du kan och närma dig.".to_owned(),
            |(a, b)| {
                format!(
                    "🎯 Multiplikation baklänges:\n• Hur många {b}:or ryms i {a}?\n{}",
                    number_line(0, a, b)
                )
            },
        ),
        "taluppfattning" => place_value_hint(&text, first),
        "klockan" => clock_hint(&text).to_owned(),
        "mätning" => "🎯 Prefix: 1 m = 100 cm, 1 km = 1000 m, 1 kg = 1000 g.".to_owned(),
        "geometri" if text.contains("hörn") => {
            "🎯 Räkna hörn. Kvadrat har 4 hörn och 4 lika sidor.".to_owned()
        }
        "geometri" => "🎯 Titta på antal sidor/hörn och om sidorna är lika långa.".to_owned(),
        _ if area.eq_ignore_ascii_case("problem")
            || text.contains("har ")
            || text.contains("får ") =>
        {
            "🎯 Mini-ekvation: start ± förändring = svar. Rita hoppen mentalt.".to_owned()
        }
        _ => "🎯 Dela upp i enkla steg: sikta på 10/100, dubbla/halvera, överslag.".to_owned(),
    }
}

fn addition_hint(a: i64, b: i64) -> String {
    let big = a.max(b);
    let small = a.min(b);
    let to_ten = (10 - big.rem_euclid(10)).rem_euclid(10);
    if to_ten != 0 && to_ten <= small {
        let rest = small - to_ten;
        return format!(
            "🎯 Gör en tia:\n• {big} + {to_ten} = {}\n• Lägg på resten: {rest}\n{} … + {rest}",
            big + to_ten,
            jumps(big, to_ten, 1)
        );
    }
    let ellipsis = if small > 6 { " …" } else { "" };
    format!(
        "🎯 Räkna från det större talet:\n• Börja på {big} och hoppa {small} steg.\n{}{ellipsis}",
        jumps(big, 1, small.min(6))
    )
}

fn subtraction_hint(a: i64, b: i64) -> String {
    let down_to_ten = a.rem_euclid(10);
    if down_to_ten != 0 && b > down_to_ten {
        let rest = b - down_to_ten;
        let tail = if rest == 0 {
            String::new()
        } else {
            format!("  →  {}", a - b)
        };
        return format!(
            "🎯 Dela upp till närmaste tia:\n• {a} → {}\n• Ta resten: {rest}\n{}{tail}",
            a - down_to_ten,
            number_line(a, a - down_to_ten, down_to_ten)
        );
    }
    format!(
        "🎯 Räkna upp: börja vid {} och hoppa till {a}.\n{}",
        a - b,
        number_line(a - b, a, 1)
    )
}

fn multiplication_hint(a: i64, b: i64) -> String {
    let other = |factor: i64| if a == factor { b } else { a };
    if a == 9 || b == 9 {
        let n = other(9);
        return format!("🎯 9-knepet: 10×{n} − {n}\n• 10×{n} = {}\n• {} − {n} = …", 10 * n, 10 * n);
    }
    if a == 4 || b == 4 {
        let n = other(4);
        return format!("🎯 Dubbla-dubbla (4×{n}):\n• Dubbla {n} → {}\n• Dubbla igen → …", n * 2);
    }
    if a == 8 || b == 8 {
        let n = other(8);
        return format!("🎯 Dubbla tre gånger (8×{n}):\n• {n} → {} → {} → …", n * 2, n * 4);
    }
    if a == 5 || b == 5 {
        let n = other(5);
        let ellipsis = if n > 6 { " …" } else { "" };
        return format!(
            "🎯 5-steg:\n• Räkna {n} femmor: 5, 10, 15, …\n{}{ellipsis}",
            jumps(0, 5, n.min(6))
        );
    }
    "🎯 Bryt upp: n×m = n×(m−1) + n. Använd ×10 eller ×5 som ankare.".to_owned()
}

fn place_value_hint(text: &str, first: Option<i64>) -> String {
    if text.contains("tiotal")
        && let Some(n) = first
    {
        return format!(
            "🎯 Dela upp i tiotal/ental:\n• {n} = {} tiotal och {} ental.",
            n.div_euclid(10),
            n.rem_euclid(10)
        );
    }
    if text.contains("störst") {
        return "🎯 Jämför först tiotalen. Om lika – jämför entalen.".to_owned();
    }
    "🎯 Dela upp tal i tiotal/ental. Resonera på tiotal först.".to_owned()
}

fn clock_hint(text: &str) -> &'static str {
    if text.contains("halv") {
        "🎯 \"Halv tre\" = 30 min innan tre → …:30."
    } else if text.contains("kvart") {
        "🎯 Kvart = 15 min. 'Kvart över X'=X:15, 'Kvart i X'=(X−1):45."
    } else {
        "🎯 60 min per varv. Halv = :30, kvart = :15 eller :45."
    }
}

/// Extracts the unsigned integers in `text` in order of appearance.
fn numbers_in(text: &str) -> Vec<i64> {
    text.split(|ch: char| !ch.is_ascii_digit())
        .filter(|part| !part.is_empty())
        .filter_map(|part| part.parse().ok())
        .collect()
}

/// Renders `count` jumps of `step` starting at `start`.
fn jumps(start: i64, step: i64, count: i64) -> String {
    let mut out = start.to_string();
    let mut current = start;
    for _ in 0..count.max(0) {
        current += step;
        out.push_str(&format!(" ──➜ {current}"));
    }
    out
}

/// Renders a number line from `start` towards `end` in steps of `step`.
fn number_line(start: i64, end: i64, step: i64) -> String {
    let stride = if step == 0 { 1 } else { step.abs() };
    let direction = if start <= end { 1 } else { -1 };
    let mut current = start;
    let mut points = vec![current.to_string()];
    while points.len() <= MAX_LINE_POINTS
        && ((direction > 0 && current < end) || (direction < 0 && current > end))
    {
        current += direction * stride;
        points.push(current.to_string());
    }
    points.join("  →  ")
}

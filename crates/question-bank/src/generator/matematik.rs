//! Mathematics multiple-choice items.

use rand::Rng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

use super::strategy::math_strategy;
use super::{OPTION_COUNT, owned, pick};
use crate::error::GenerationError;
use crate::model::{Item, ItemKind, Subject};
use crate::plan::{MatematikTask, PlanTask};
use crate::profile::Profile;
use crate::shuffle::options_with_pool;

const NEAR_MISSES: &[i64] = &[-10, -2, -1, 1, 2, 10];

const HOUR_WORDS: &[&str] = &[
    "ett", "två", "tre", "fyra", "fem", "sex", "sju", "åtta", "nio", "tio", "elva", "tolv",
];

/// Prompt, answer and distractors.
const SHAPES: &[(&str, &str, &[&str])] = &[
    ("Hur många hörn har en kvadrat?", "4", &["2", "3", "5", "6"]),
    ("Hur många hörn har en triangel?", "3", &["2", "4", "5"]),
    ("Hur många sidor har en rektangel?", "4", &["3", "5", "6"]),
    ("Hur många hörn har en femhörning?", "5", &["3", "4", "6"]),
    (
        "Vilken figur har alla sidor lika långa?",
        "Kvadrat",
        &["Rektangel", "Triangel", "Cirkel"],
    ),
    (
        "Vilken figur saknar hörn?",
        "Cirkel",
        &["Kvadrat", "Triangel", "Rektangel"],
    ),
];

const UNITS: &[(&str, &str, &[&str])] = &[
    ("1 meter = ___ cm", "100", &["10", "50", "1000"]),
    ("1 kg = ___ g", "1000", &["100", "10", "500"]),
    ("1 km = ___ m", "1000", &["100", "10", "10000"]),
    ("1 liter = ___ dl", "10", &["100", "5", "1000"]),
    ("1 dm = ___ cm", "10", &["100", "1", "1000"]),
];

/// Name and subject pronoun.
const PEOPLE: &[(&str, &str)] = &[
    ("Lisa", "hon"),
    ("Ali", "han"),
    ("Maja", "hon"),
    ("Omar", "han"),
    ("Sara", "hon"),
    ("Noah", "han"),
];
const THINGS: &[&str] = &["kulor", "äpplen", "klistermärken", "pennor", "kort"];

/// Generates one mathematics multiple-choice item for `task`.
///
/// Every item gets a strategy hint derived from its prompt.
///
/// # Errors
///
/// Returns [`GenerationError::EmptyPool`] when the profile leaves no valid
/// division, or when a template table is empty.
pub fn matematik_item(
    task: MatematikTask,
    profile: &Profile,
    rng: &mut ChaCha8Rng,
) -> Result<Item, GenerationError> {
    let (prompt, answer, pool, explain) = match task {
        MatematikTask::Addition => addition(rng),
        MatematikTask::Subtraktion => subtraction(rng),
        MatematikTask::Multiplikation => multiplication(rng),
        MatematikTask::Division => division(profile, rng)?,
        MatematikTask::Taluppfattning => place_value(rng),
        MatematikTask::Geometri => table_question(SHAPES, "geometri", rng)?,
        MatematikTask::Klockan => clock(rng)?,
        MatematikTask::Matning => measurement(rng)?,
        MatematikTask::Problem => word_problem(rng)?,
    };
    let (options, correct) = options_with_pool(&answer, &pool, OPTION_COUNT, rng)?;
    let hint = math_strategy(task.area(), &prompt);
    Ok(Item::new(task.area(), prompt, ItemKind::Mc { options, correct })
        .with_help(hint, explain)
        .with_labels(Subject::Matematik.as_str(), profile.difficulty()))
}

/// Prompt, answer, distractor pool and explanation.
type Draft = (String, String, Vec<String>, String);

fn addition(rng: &mut ChaCha8Rng) -> Draft {
    let a = rng.random_range(3..=49);
    let b = rng.random_range(3..=49);
    let sum = a + b;
    (
        format!("{a} + {b} ="),
        sum.to_string(),
        near_misses(sum, NEAR_MISSES, rng),
        format!("{a} + {b} = {sum}"),
    )
}

fn subtraction(rng: &mut ChaCha8Rng) -> Draft {
    let a = rng.random_range(8..=99);
    let b = rng.random_range(2..=(a - 1).min(20));
    let difference = a - b;
    (
        format!("{a} − {b} ="),
        difference.to_string(),
        near_misses(difference, NEAR_MISSES, rng),
        format!("{a} − {b} = {difference}"),
    )
}

fn multiplication(rng: &mut ChaCha8Rng) -> Draft {
    let a = rng.random_range(2..=9);
    let b = rng.random_range(2..=9);
    let product = a * b;
    (
        format!("{a} × {b} ="),
        product.to_string(),
        near_misses(product, NEAR_MISSES, rng),
        format!("{a} × {b} = {product}"),
    )
}

/// Lists every `(dividend, divisor, quotient)` the profile allows.
pub(crate) fn division_candidates(profile: &Profile) -> Vec<(i64, i64, i64)> {
    let max_dividend = i64::from(profile.max_dividend);
    let mut candidates = Vec::new();
    for divisor in 2..=10_i64 {
        if !profile.allow_nine && divisor == 9 {
            continue;
        }
        for quotient in 2..=10_i64 {
            let dividend = divisor * quotient;
            if dividend > max_dividend || (!profile.allow_nine && dividend.rem_euclid(9) == 0) {
                continue;
            }
            candidates.push((dividend, divisor, quotient));
        }
    }
    candidates
}

fn division(profile: &Profile, rng: &mut ChaCha8Rng) -> Result<Draft, GenerationError> {
    let candidates = division_candidates(profile);
    let (dividend, divisor, quotient) = *pick(&candidates, "division", rng)?;
    Ok((
        format!("{dividend} ÷ {divisor} ="),
        quotient.to_string(),
        near_misses(quotient, &[-2, -1, 1, 2], rng)
            .into_iter()
            .filter(|option| option != "0")
            .collect(),
        format!("{divisor} × {quotient} = {dividend}, alltså {dividend} ÷ {divisor} = {quotient}"),
    ))
}

fn place_value(rng: &mut ChaCha8Rng) -> Draft {
    if rng.random_bool(0.5) {
        let n: i64 = rng.random_range(11..=99);
        let tens = n.div_euclid(10);
        return (
            format!("Hur många tiotal finns i {n}?"),
            tens.to_string(),
            near_misses(tens, &[-1, 1, 2, -2], rng),
            format!("{n} = {tens} tiotal och {} ental.", n.rem_euclid(10)),
        );
    }
    let a: i64 = rng.random_range(30..60);
    let offset: i64 = rng.random_range(1..30);
    let b = 30 + (a - 30 + offset).rem_euclid(30);
    let (smaller, larger) = (a.min(b), a.max(b));
    // Every distractor must be smaller than the answer.
    let pool: Vec<String> = [smaller, smaller - 1, smaller + 1, larger - 1, smaller - 2]
        .into_iter()
        .filter(|value| *value < larger)
        .map(|value| value.to_string())
        .collect();
    (
        "Vilket tal är störst?".to_owned(),
        larger.to_string(),
        pool,
        format!("{larger} har flest tiotal eller ental."),
    )
}

fn table_question(
    table: &[(&str, &str, &[&str])],
    name: &'static str,
    rng: &mut ChaCha8Rng,
) -> Result<Draft, GenerationError> {
    let (prompt, answer, distractors) = *pick(table, name, rng)?;
    let mut pool = owned(distractors);
    pool.shuffle(rng);
    Ok((
        prompt.to_owned(),
        answer.to_owned(),
        pool,
        format!("Rätt svar: {answer}."),
    ))
}

fn clock(rng: &mut ChaCha8Rng) -> Result<Draft, GenerationError> {
    let hour: i64 = rng.random_range(1..=12);
    let previous = previous_hour(hour);
    let word_index = usize::try_from(hour - 1).unwrap_or(0);
    let word = *HOUR_WORDS
        .get(word_index)
        .ok_or(GenerationError::EmptyPool { pool: "klockan" })?;
    let renderings = [
        ("Prick", format!("{hour:02}:00")),
        ("Halv", format!("{previous:02}:30")),
        ("Kvart över", format!("{hour:02}:15")),
        ("Kvart i", format!("{previous:02}:45")),
    ];
    let (label, answer) = pick(&renderings, "klockan", rng)?.clone();
    let pool = renderings
        .iter()
        .map(|(_, digital)| digital.clone())
        .filter(|digital| *digital != answer)
        .collect();
    Ok((
        format!("{label} {word} i digital tid:"),
        answer.clone(),
        pool,
        format!("{label} {word} skrivs {answer}."),
    ))
}

/// Hour before `hour` on a twelve-hour dial.
const fn previous_hour(hour: i64) -> i64 {
    (hour + 10).rem_euclid(12) + 1
}

fn measurement(rng: &mut ChaCha8Rng) -> Result<Draft, GenerationError> {
    if rng.random_bool(0.5) {
        return table_question(UNITS, "mätning", rng);
    }
    let metres: i64 = rng.random_range(2..=9);
    let centimetres = metres * 100;
    Ok((
        format!("{metres} m = ___ cm"),
        centimetres.to_string(),
        vec![
            (metres * 10).to_string(),
            (metres * 1000).to_string(),
            (metres + 100).to_string(),
        ],
        format!("1 m = 100 cm, så {metres} m = {centimetres} cm."),
    ))
}

fn word_problem(rng: &mut ChaCha8Rng) -> Result<Draft, GenerationError> {
    let (name, pronoun) = *pick(PEOPLE, "problem", rng)?;
    let thing = *pick(THINGS, "problem", rng)?;
    let start: i64 = rng.random_range(5..=20);
    let (prompt, answer) = if rng.random_bool(0.5) {
        let gained: i64 = rng.random_range(3..=15);
        (
            format!(
                "{name} har {start} {thing} och får {gained} till. Hur många har {pronoun} nu?"
            ),
            start + gained,
        )
    } else {
        let given: i64 = rng.random_range(2..start.min(16));
        (
            format!(
                "{name} har {start} {thing} och ger bort {given}. Hur många har {pronoun} kvar?"
            ),
            start - given,
        )
    };
    Ok((
        prompt,
        answer.to_string(),
        near_misses(answer, &[-2, -1, 1, 2, 5], rng),
        format!("Svaret är {answer} {thing}."),
    ))
}

/// Offsets `answer` by `deltas`, keeping non-negative values in random order.
fn near_misses(answer: i64, deltas: &[i64], rng: &mut ChaCha8Rng) -> Vec<String> {
    let mut pool: Vec<String> = deltas
        .iter()
        .map(|delta| answer + delta)
        .filter(|value| *value >= 0)
        .map(|value| value.to_string())
        .collect();
    pool.shuffle(rng);
    pool
}

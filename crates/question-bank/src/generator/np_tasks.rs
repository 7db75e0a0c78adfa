//! National-test style tasks: table filling, pie chart matching and
//! chance statements.

use std::collections::BTreeMap;

use rand::Rng;
use rand::seq::{IndexedMutRandom, IndexedRandom, SliceRandom};
use rand_chacha::ChaCha8Rng;

use super::{pick, pick_many};
use crate::error::GenerationError;
use crate::model::{ChanceStatement, Item, ItemKind, PieSegment, Subject, Table, TableRow};
use crate::profile::Profile;

const HEADERS: [&str; 3] = ["Första", "Andra", "Tredje"];
const JUMPERS: &[&str] = &["Vera", "Gabriel", "Ahmed", "Maja", "Omar", "Sara"];

/// Percent splits without ties, largest first.
const SPLITS: &[[u32; 3]] = &[
    [50, 30, 20],
    [40, 35, 25],
    [60, 25, 15],
    [45, 35, 20],
    [70, 20, 10],
];
const ACTIVITIES: &[&str] = &["Dans", "Innebandy", "Löpning", "Cykling", "Längdhopp", "Fotboll"];
const COLOURS: &[&str] = &["blå", "svart", "röd", "grön", "gul"];

/// Builds a three-attempt jump table with three or four blank cells.
///
/// # Errors
///
/// Returns [`GenerationError::EmptyPool`] when the name table is too small.
pub fn table_fill(profile: &Profile, rng: &mut ChaCha8Rng) -> Result<Item, GenerationError> {
    let names = pick_many(JUMPERS, HEADERS.len(), "hoppare", rng)?;
    let base: i64 = rng.random_range(95..=160);
    let mut increments: Vec<i64> = (3..10)
        .collect::<Vec<_>>()
        .choose_multiple(rng, 3)
        .copied()
        .collect();
    increments.sort_unstable();

    let mut rows = Vec::new();
    let mut answers = BTreeMap::new();
    for ((row, name), increment) in (0_i64..).zip(names).zip(increments) {
        let first = base + rng.random_range(-8..=8) + row * rng.random_range(1..=4);
        let second = first + increment;
        let third = second + rng.random_range(3..=8);
        let mut cells: Vec<String> = [first, second, third]
            .iter()
            .map(ToString::to_string)
            .collect();
        blank_cell(name, &mut cells, &mut answers, rng);
        rows.push(TableRow {
            key: name.to_owned(),
            cells,
        });
    }
    if rng.random_bool(0.5)
        && let Some(row) = rows.choose_mut(rng)
    {
        blank_cell(&row.key, &mut row.cells, &mut answers, rng);
    }

    Ok(Item::new(
        "tabell-diagram",
        "Fyll i de tomma rutorna.",
        ItemKind::TableFill {
            table: Table {
                headers: HEADERS.iter().map(|header| (*header).to_owned()).collect(),
                rows,
            },
            answers,
        },
    )
    .with_help(
        "Jämför inom samma rad. Leta efter jämna steg mellan försöken.",
        "Titta rad för rad. Skillnaderna är små och relativt jämna mellan försöken.",
    )
    .with_labels(Subject::Matematik.as_str(), profile.difficulty()))
}

/// Empties one random non-empty cell and records its value.
fn blank_cell(
    key: &str,
    cells: &mut [String],
    answers: &mut BTreeMap<String, String>,
    rng: &mut ChaCha8Rng,
) {
    let column = rng.random_range(0..HEADERS.len());
    if let (Some(cell), Some(header)) = (cells.get_mut(column), HEADERS.get(column))
        && !cell.is_empty()
    {
        answers.insert(format!("{key}|{header}"), std::mem::take(cell));
    }
}

/// Builds a pie chart whose segments are matched with activities.
///
/// The prompt names the most and least chosen activity; the middle one
/// follows from those.
///
/// # Errors
///
/// Returns [`GenerationError::EmptyPool`] when the split or activity tables
/// are too small.
pub fn pie_assign(profile: &Profile, rng: &mut ChaCha8Rng) -> Result<Item, GenerationError> {
    let split = pick(SPLITS, "cirkeldiagram", rng)?;
    let ranked = pick_many(ACTIVITIES, split.len(), "aktiviteter", rng)?;

    let mut segments = Vec::new();
    let mut solution = BTreeMap::new();
    for (position, (percent, label)) in split.iter().zip(&ranked).enumerate() {
        let id = format!("s{}", position + 1);
        solution.insert(id.clone(), (*label).to_owned());
        segments.push(PieSegment {
            id,
            percent: *percent,
        });
    }
    segments.shuffle(rng);

    let most = ranked.first().copied().unwrap_or_default();
    let least = ranked.last().copied().unwrap_or_default();
    let mut labels: Vec<String> = ranked.iter().map(|label| (*label).to_owned()).collect();
    labels.shuffle(rng);

    Ok(Item::new(
        "diagram",
        format!(
            "Para ihop aktiviteter med andelar i cirkeldiagrammet. \
             Flest valde {most}. Minst valde {least}."
        ),
        ItemKind::PieAssign {
            segments,
            labels,
            solution,
        },
    )
    .with_help(
        "Hälften = 50%. En fjärdedel = 25%. Titta på vilken bit som är störst/mellan/minst.",
        "Största andelen matchar den aktivitet som flest valde osv.",
    )
    .with_labels(Subject::Matematik.as_str(), profile.difficulty()))
}

/// Builds three or four true/false statements about drawing a coloured
/// lollipop from a bag.
///
/// # Errors
///
/// Returns [`GenerationError::EmptyPool`] when the colour table is too small.
pub fn chance_matrix(profile: &Profile, rng: &mut ChaCha8Rng) -> Result<Item, GenerationError> {
    let colours = pick_many(COLOURS, 3, "färger", rng)?;
    let mut counts: Vec<u32> = (0..3).map(|_| rng.random_range(2..=5)).collect();
    counts.sort_unstable_by(|left, right| right.cmp(left));
    let bag: Vec<(&str, u32)> = colours.into_iter().zip(counts).collect();
    let &[(top, top_count), (middle, middle_count), (bottom, bottom_count)] = bag.as_slice() else {
        return Err(GenerationError::EmptyPool { pool: "färger" });
    };
    let total = top_count + middle_count + bottom_count;

    let (least, least_count, other_count) = if rng.random_bool(0.5) {
        (middle, middle_count, bottom_count)
    } else {
        (bottom, bottom_count, middle_count)
    };
    let mut statements = vec![
        ChanceStatement {
            text: format!("Det är störst chans att få en {top} klubba."),
            answer: top_count > middle_count,
        },
        ChanceStatement {
            text: format!("Det är minst chans att få en {least} klubba."),
            answer: least_count < other_count && least_count < top_count,
        },
        ChanceStatement {
            text: format!("Det är lika stor chans att få {middle} som {bottom}."),
            answer: middle_count == bottom_count,
        },
        ChanceStatement {
            text: format!("Det är större chans att få {middle} än {bottom}."),
            answer: middle_count > bottom_count,
        },
    ];
    statements.shuffle(rng);
    statements.truncate(rng.random_range(3..=4));

    let context = bag
        .iter()
        .map(|(colour, count)| ((*colour).to_owned(), *count))
        .collect();
    Ok(Item::new(
        "sannolikhet",
        "Kryssa Sant/Falskt utifrån antalen.",
        ItemKind::ChanceMatrix {
            context,
            statements,
        },
    )
    .with_help(
        "Jämför andelar: antal färg / totalt.",
        format!("Totalt {total}. Jämför t.ex. {top}: {top_count}/{total} osv."),
    )
    .with_labels(Subject::Matematik.as_str(), profile.difficulty()))
}

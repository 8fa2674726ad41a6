use crate::domain::model::{DrawPeriod, DrawRecord, DrawStatistics, NumberFrequency};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Mega-Sena 號碼範圍 1..=60
pub const HIGHEST_NUMBER: u64 = 60;

/// 統計各號碼在開獎紀錄中出現的次數。
///
/// 所有號碼都從 0 起算，沒開出過的號碼也會出現在最少開出的名單；
/// 範圍外的號碼不列入統計。
pub fn summarize(draws: &[DrawRecord], top: usize) -> DrawStatistics {
    let mut counts: HashMap<String, usize> = (1..=HIGHEST_NUMBER)
        .map(|n| (n.to_string(), 0))
        .collect();
    for draw in draws {
        for number in draw.numbers() {
            match counts.get_mut(&number) {
                Some(count) => *count += 1,
                None => tracing::debug!("Ignoring out-of-range number '{}' in draw {}", number, draw.id),
            }
        }
    }

    let mut frequencies: Vec<NumberFrequency> = counts
        .into_iter()
        .map(|(number, frequency)| NumberFrequency { number, frequency })
        .collect();
    tracing::debug!(
        "Summarizing {} draws ({} numbers drawn at least once)",
        draws.len(),
        frequencies.iter().filter(|f| f.frequency > 0).count()
    );

    frequencies.sort_by(|a, b| {
        b.frequency
            .cmp(&a.frequency)
            .then_with(|| compare_numbers(&a.number, &b.number))
    });
    let most_drawn: Vec<NumberFrequency> = frequencies.iter().take(top).cloned().collect();

    frequencies.sort_by(|a, b| {
        a.frequency
            .cmp(&b.frequency)
            .then_with(|| compare_numbers(&a.number, &b.number))
    });
    let least_drawn: Vec<NumberFrequency> = frequencies.into_iter().take(top).collect();

    let mut dates = draws.iter().filter_map(DrawRecord::draw_date);
    let period = dates.next().map(|first| {
        let (start, end) = dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d)));
        DrawPeriod { start, end }
    });

    DrawStatistics {
        draws_analyzed: draws.len(),
        period,
        most_drawn,
        least_drawn,
    }
}

// 數字依數值排序，非數字排在後面
fn compare_numbers(a: &str, b: &str) -> Ordering {
    match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

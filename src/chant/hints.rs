// Breath-pause hints for long unpunctuated segments
// Greedy sliding-window search scored over a beat-counting model

use tracing::{debug, trace};

use super::{Segment, Syllable};

/// Beats searched for before the first hint of a segment
pub const FIRST_TARGET: i64 = 22;
/// Beats searched for after each placed hint
pub const NEXT_TARGET: i64 = 13;
/// Radius of the candidate window, in syllables
pub const MAX_SPREAD: i64 = 4;
/// Radius of the space-proximity scan, in syllables
pub const SPACE_RADIUS: i64 = 5;

const BASE_SCORE: i64 = 100;
const COMPOUND_PENALTY_PER_SPACE: i64 = 50;
const NEXT_SPACE_BONUS: i64 = 150;
const LIST_MULTIPLIER: f64 = 10.0;
const BORDER_BASE: f64 = 5.0;
const BORDER_DAMPING: f64 = 0.42;

/// Counters over a prefix of a segment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BeatStats {
    pub long: i64,
    pub short: i64,
    /// Units of irrelevant syllables whose text holds an ASCII space
    pub spaces: i64,
}

impl BeatStats {
    pub fn beats(&self) -> i64 {
        self.long * 2 + self.short
    }

    fn add(&mut self, syllable: &Syllable) {
        if syllable.irrelevant {
            self.spaces += syllable.units.iter().filter(|u| u.text.contains(' ')).count() as i64;
        } else if syllable.is_long {
            self.long += 1;
        } else {
            self.short += 1;
        }
    }
}

/// Cumulative counters for every prefix of a segment, built once per segment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BeatPrefix {
    /// `cumulative[i]` covers the first `i` syllables
    cumulative: Vec<BeatStats>,
}

impl BeatPrefix {
    pub fn new(syllables: &[Syllable]) -> Self {
        let mut cumulative = Vec::with_capacity(syllables.len() + 1);
        let mut stats = BeatStats::default();
        cumulative.push(stats);
        for syllable in syllables {
            stats.add(syllable);
            cumulative.push(stats);
        }
        Self { cumulative }
    }

    fn syllable_count(&self) -> usize {
        self.cumulative.len() - 1
    }

    pub fn total(&self) -> BeatStats {
        self.cumulative.last().copied().unwrap_or_default()
    }

    /// Stats over indexes `0..=max_index`, or the whole segment for `None`
    pub fn describe_up_to(&self, max_index: Option<usize>) -> BeatStats {
        let count = self.syllable_count();
        let end = max_index.map_or(count, |i| i.saturating_add(1).min(count));
        self.cumulative[end]
    }

    /// First index whose cumulative beats reach `target`; 0 when never reached
    pub fn find_target_index(&self, target: i64) -> usize {
        // beats never decrease along a segment
        let index = self.cumulative[1..].partition_point(|stats| stats.beats() < target);
        if index == self.syllable_count() {
            0
        } else {
            index
        }
    }
}

/// Enumerations of short words missing their punctuation
pub fn is_list_mode(total: &BeatStats, target: i64, sensitivity: f64) -> bool {
    let ratio = total.beats() as f64 / total.spaces as f64;
    total.beats() > 3 * target && ratio < sensitivity
}

/// Sum of per-neighbour sub-penalties for spaces around `position`; negative values are bonuses
pub fn space_proximity_penalty(syllables: &[Syllable], position: usize, list_mode: bool) -> i64 {
    let mut penalty = 0;
    for distance in -SPACE_RADIUS..=SPACE_RADIUS {
        if distance == 0 {
            continue;
        }
        let Some(neighbour) = position
            .checked_add_signed(distance as isize)
            .and_then(|j| syllables.get(j))
        else {
            continue;
        };

        let spaced = neighbour.contains_space();
        let mut factor = if spaced && distance < 0 {
            30.0
        } else if spaced && distance > 1 {
            -20.0 * SPACE_RADIUS as f64 / distance as f64
        } else if !spaced && distance < 0 {
            -3.0
        } else {
            0.0
        };
        if list_mode && factor < 0.0 {
            factor *= LIST_MULTIPLIER;
        }
        let sub_penalty = (SPACE_RADIUS as f64 / -(distance as f64) * factor) as i64;
        if sub_penalty != 0 {
            trace!(distance, factor, sub_penalty, "Space proximity");
        }
        penalty += sub_penalty;
    }
    penalty
}

/// Applies inside a long compound word, where spaces change both before and after the candidate
pub fn compound_word_penalty(
    list_mode: bool,
    total: &BeatStats,
    at: &BeatStats,
    prev: &BeatStats,
    next: &BeatStats,
) -> i64 {
    let remaining_spaces = total.spaces - at.spaces;
    if !list_mode && remaining_spaces >= 0 && !(next.spaces == at.spaces || prev.spaces == at.spaces) {
        remaining_spaces * COMPOUND_PENALTY_PER_SPACE
    } else {
        0
    }
}

/// Penalty for a pause close to the end of the segment; `None` when it overflows
pub fn border_penalty(remaining: i64, target: i64) -> Option<i64> {
    if remaining >= target + MAX_SPREAD {
        return Some(0);
    }
    let penalty = BORDER_BASE.powf(target as f64 / ((remaining + 1) as f64 * BORDER_DAMPING));
    if !penalty.is_finite() || penalty >= i64::MAX as f64 {
        return None;
    }
    Some(penalty as i64)
}

/// Bonus for the syllable right before a space
pub fn next_space_bonus(
    syllables: &[Syllable],
    position: usize,
    list_mode: bool,
    at: &BeatStats,
    next: &BeatStats,
) -> i64 {
    let spaced = syllables.get(position + 1).is_some_and(Syllable::contains_space);
    if spaced && (next.spaces - at.spaces == 1 || list_mode) {
        NEXT_SPACE_BONUS
    } else {
        0
    }
}

/// `12x³ − 66x² + 122x − 60` for `x = |offset|`, zero at the window centre
pub fn spread_penalty(offset: i64) -> i64 {
    if offset == 0 {
        return 0;
    }
    let x = offset.unsigned_abs() as f64;
    (12.0 * x.powi(3) - 66.0 * x.powi(2) + 122.0 * x - 60.0) as i64
}

/// A syllable considered for a hint, `offset` syllables away from the window centre
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub position: usize,
    pub offset: i64,
}

/// Everything a candidate's score depends on besides the candidate itself
#[derive(Debug, Clone, Copy)]
pub struct HintContext<'a> {
    pub syllables: &'a [Syllable],
    pub prefix: &'a BeatPrefix,
    pub target: i64,
    pub sensitivity: f64,
}

impl HintContext<'_> {
    pub fn score(&self, candidate: Candidate) -> i64 {
        let syllables = self.syllables;
        let position = candidate.position;
        if !syllables[position].is_long {
            return 0;
        }

        let prefix = self.prefix;
        let total = prefix.total();
        let at = prefix.describe_up_to(Some(position));
        let prev = prefix.describe_up_to(Some(prefix.find_target_index(at.beats() - self.target)));
        let next = prefix.describe_up_to(Some(prefix.find_target_index(at.beats() + self.target)));
        let list_mode = is_list_mode(&total, self.target, self.sensitivity);

        let mut score = BASE_SCORE;
        score = score.saturating_sub(space_proximity_penalty(syllables, position, list_mode));
        score = score.saturating_sub(compound_word_penalty(list_mode, &total, &at, &prev, &next));
        match border_penalty(total.beats() - at.beats(), self.target) {
            Some(penalty) => score = score.saturating_sub(penalty),
            None => {
                trace!(position, "Border penalty overflow");
                return 0;
            }
        }
        score = score.saturating_add(next_space_bonus(syllables, position, list_mode, &at, &next));
        score = score.saturating_sub(spread_penalty(candidate.offset));

        trace!(position, offset = candidate.offset, list_mode, score, "Scored candidate");
        score
    }

    /// In-bounds candidates around `anchor`, most negative offset first
    pub fn candidates(&self, anchor: usize) -> impl Iterator<Item = Candidate> + '_ {
        (-MAX_SPREAD..=MAX_SPREAD).filter_map(move |offset| {
            anchor
                .checked_add_signed(offset as isize)
                .filter(|&position| position < self.syllables.len())
                .map(|position| Candidate { position, offset })
        })
    }

    /// Highest-scoring candidate; ties go to the earliest
    pub fn best(&self, anchor: usize) -> Option<(Candidate, i64)> {
        self.candidates(anchor)
            .map(|candidate| (candidate, self.score(candidate)))
            .fold(None, |best, (candidate, score)| match best {
                Some((_, best_score)) if best_score >= score => best,
                _ => Some((candidate, score)),
            })
    }
}

/// Place hints in one segment; returns how many were placed
pub fn place_segment_hints(segment: &mut Segment, sensitivity: f64) -> usize {
    let prefix = BeatPrefix::new(&segment.syllables);
    let total = prefix.total();
    let mut target = FIRST_TARGET;
    let mut covered = 0;
    let mut placed = 0;

    while total.beats() - covered > target + MAX_SPREAD {
        let anchor = prefix.find_target_index(covered + target);
        let context = HintContext {
            syllables: &segment.syllables,
            prefix: &prefix,
            target,
            sensitivity,
        };
        let Some((candidate, score)) = context.best(anchor).filter(|(_, score)| *score > 0) else {
            break;
        };

        debug!(position = candidate.position, score, target, "Placed hint");
        segment.syllables[candidate.position].hint = true;
        covered = prefix.describe_up_to(Some(candidate.position)).beats();
        target = NEXT_TARGET;
        placed += 1;
    }
    placed
}

/// Counts reported after hint placement
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HintSummary {
    /// Segments that received at least one hint
    pub hinted_segments: usize,
    pub hints: usize,
}

/// Place hints in every segment; a sensitivity of 0 disables placement entirely
pub fn place_hints(segments: &mut [Segment], sensitivity: f64) -> HintSummary {
    let mut summary = HintSummary::default();
    if sensitivity == 0.0 {
        debug!("Hint placement disabled");
        return summary;
    }

    for segment in segments.iter_mut() {
        let placed = place_segment_hints(segment, sensitivity);
        if placed > 0 {
            summary.hinted_segments += 1;
            summary.hints += placed;
        }
    }

    if !segments.is_empty() {
        debug!(
            "Added hints in {:.1}% of all segments ({}/{})",
            summary.hinted_segments as f64 / segments.len() as f64 * 100.0,
            summary.hinted_segments,
            segments.len()
        );
    }
    summary
}

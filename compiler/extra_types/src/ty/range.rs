//! Narrowed numeric and length intervals.
//!
//! `Int(>=0)`, `Float(<1)`, `Array(T, length: >=1)`: the bounds a narrowed
//! type carries. Numeric bounds may be exclusive; integer and length bounds
//! are kept inclusive so `Int(<5)` and `Int(<=4)` compare equal.

use extra_ir::Operator;

/// One end of a numeric interval.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Bound {
    pub value: f64,
    pub exclusive: bool,
}

impl Bound {
    pub const fn inclusive(value: f64) -> Self {
        Bound {
            value,
            exclusive: false,
        }
    }

    pub const fn exclusive(value: f64) -> Self {
        Bound {
            value,
            exclusive: true,
        }
    }
}

/// `true` if lower bound `a` admits every value lower bound `b` admits.
fn min_looser(a: Option<Bound>, b: Option<Bound>) -> bool {
    match (a, b) {
        (None, _) => true,
        (Some(_), None) => false,
        (Some(a), Some(b)) => a.value < b.value || (a.value == b.value && (!a.exclusive || b.exclusive)),
    }
}

/// `true` if upper bound `a` admits every value upper bound `b` admits.
fn max_looser(a: Option<Bound>, b: Option<Bound>) -> bool {
    match (a, b) {
        (None, _) => true,
        (Some(_), None) => false,
        (Some(a), Some(b)) => a.value > b.value || (a.value == b.value && (!a.exclusive || b.exclusive)),
    }
}

/// The bounds of a narrowed `Int` or `Float`. `None` is unbounded.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub struct NumberRange {
    pub min: Option<Bound>,
    pub max: Option<Bound>,
}

impl NumberRange {
    pub const ANY: NumberRange = NumberRange {
        min: None,
        max: None,
    };

    pub const fn at_least(value: f64) -> Self {
        NumberRange {
            min: Some(Bound::inclusive(value)),
            max: None,
        }
    }

    pub const fn at_most(value: f64) -> Self {
        NumberRange {
            min: None,
            max: Some(Bound::inclusive(value)),
        }
    }

    pub const fn between(min: f64, max: f64) -> Self {
        NumberRange {
            min: Some(Bound::inclusive(min)),
            max: Some(Bound::inclusive(max)),
        }
    }

    pub const fn exactly(value: f64) -> Self {
        NumberRange::between(value, value)
    }

    /// The values satisfying `x <op> value`, for the ordering comparisons
    /// and `==`.
    pub fn from_comparison(op: Operator, value: f64) -> Option<Self> {
        let range = match op {
            Operator::Less => NumberRange {
                min: None,
                max: Some(Bound::exclusive(value)),
            },
            Operator::LessEqual => NumberRange::at_most(value),
            Operator::Greater => NumberRange {
                min: Some(Bound::exclusive(value)),
                max: None,
            },
            Operator::GreaterEqual => NumberRange::at_least(value),
            Operator::Equal => NumberRange::exactly(value),
            _ => return None,
        };
        Some(range)
    }

    /// The values of a range literal `start <op> stop`.
    pub fn from_range_operator(op: Operator, start: f64, stop: f64) -> Option<Self> {
        let (start_exclusive, stop_exclusive) = match op {
            Operator::RangeInclusive => (false, false),
            Operator::RangeExclusiveStart => (true, false),
            Operator::RangeExclusiveEnd => (false, true),
            Operator::RangeExclusive => (true, true),
            _ => return None,
        };
        Some(NumberRange {
            min: Some(Bound {
                value: start,
                exclusive: start_exclusive,
            }),
            max: Some(Bound {
                value: stop,
                exclusive: stop_exclusive,
            }),
        })
    }

    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    /// Whole-number inclusive bounds: `>3` becomes `>=4`, `<=2.5` becomes
    /// `<=2`.
    #[must_use]
    pub fn to_int(self) -> Self {
        NumberRange {
            min: self.min.map(|b| {
                let value = if b.exclusive {
                    b.value.floor() + 1.0
                } else {
                    b.value.ceil()
                };
                Bound::inclusive(value)
            }),
            max: self.max.map(|b| {
                let value = if b.exclusive {
                    b.value.ceil() - 1.0
                } else {
                    b.value.floor()
                };
                Bound::inclusive(value)
            }),
        }
    }

    pub fn is_empty(&self) -> bool {
        match (self.min, self.max) {
            (Some(min), Some(max)) => {
                min.value > max.value
                    || (min.value == max.value && (min.exclusive || max.exclusive))
            }
            _ => false,
        }
    }

    /// The only value in the range, if it holds exactly one.
    pub fn single_value(&self) -> Option<f64> {
        match (self.min, self.max) {
            (Some(min), Some(max))
                if min.value == max.value && !min.exclusive && !max.exclusive =>
            {
                Some(min.value)
            }
            _ => None,
        }
    }

    pub fn contains_value(&self, value: f64) -> bool {
        let bound = Some(Bound::inclusive(value));
        min_looser(self.min, bound) && max_looser(self.max, bound)
    }

    /// `true` if every value of `other` lies inside `self`.
    pub fn contains(&self, other: &NumberRange) -> bool {
        other.is_empty() || (min_looser(self.min, other.min) && max_looser(self.max, other.max))
    }

    /// Smallest range covering both.
    #[must_use]
    pub fn hull(&self, other: &NumberRange) -> NumberRange {
        NumberRange {
            min: if min_looser(self.min, other.min) {
                self.min
            } else {
                other.min
            },
            max: if max_looser(self.max, other.max) {
                self.max
            } else {
                other.max
            },
        }
    }

    #[must_use]
    pub fn intersect(&self, other: &NumberRange) -> NumberRange {
        NumberRange {
            min: if min_looser(self.min, other.min) {
                other.min
            } else {
                self.min
            },
            max: if max_looser(self.max, other.max) {
                other.max
            } else {
                self.max
            },
        }
    }

    /// Every value moved by `offset`.
    #[must_use]
    pub fn shift(&self, offset: f64) -> NumberRange {
        let move_bound = |b: Bound| Bound {
            value: b.value + offset,
            ..b
        };
        NumberRange {
            min: self.min.map(move_bound),
            max: self.max.map(move_bound),
        }
    }

    #[must_use]
    pub fn negate(&self) -> NumberRange {
        let flip = |b: Bound| Bound {
            value: -b.value,
            ..b
        };
        NumberRange {
            min: self.max.map(flip),
            max: self.min.map(flip),
        }
    }

    /// `{a + b | a in self, b in other}`
    #[must_use]
    pub fn add(&self, other: &NumberRange) -> NumberRange {
        let sum = |a: Option<Bound>, b: Option<Bound>| match (a, b) {
            (Some(a), Some(b)) => Some(Bound {
                value: a.value + b.value,
                exclusive: a.exclusive || b.exclusive,
            }),
            _ => None,
        };
        NumberRange {
            min: sum(self.min, other.min),
            max: sum(self.max, other.max),
        }
    }

    /// Type-argument spelling: `>=1`, `<5`, `1...10`, `0..<5`. Unbounded
    /// ranges have none.
    pub fn type_args(&self) -> Option<String> {
        match (self.min, self.max) {
            (None, None) => None,
            (Some(min), None) => Some(format!(
                "{}{}",
                if min.exclusive { ">" } else { ">=" },
                format_number(min.value)
            )),
            (None, Some(max)) => Some(format!(
                "{}{}",
                if max.exclusive { "<" } else { "<=" },
                format_number(max.value)
            )),
            (Some(min), Some(max)) => {
                let op = match (min.exclusive, max.exclusive) {
                    (false, false) => "...",
                    (true, false) => "<..",
                    (false, true) => "..<",
                    (true, true) => "<.<",
                };
                Some(format!(
                    "{}{op}{}",
                    format_number(min.value),
                    format_number(max.value)
                ))
            }
        }
    }
}

/// Whole numbers without a fractional part, everything else as is.
pub(crate) fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

/// Inclusive bounds on the length of a string or collection.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct LengthRange {
    pub min: usize,
    pub max: Option<usize>,
}

impl LengthRange {
    pub const ANY: LengthRange = LengthRange { min: 0, max: None };

    pub const fn exactly(length: usize) -> Self {
        LengthRange {
            min: length,
            max: Some(length),
        }
    }

    pub const fn at_least(length: usize) -> Self {
        LengthRange {
            min: length,
            max: None,
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.min == 0 && self.max.is_none()
    }

    pub fn is_empty(&self) -> bool {
        self.max.is_some_and(|max| max < self.min)
    }

    pub fn contains_length(&self, length: usize) -> bool {
        self.min <= length && self.max.map_or(true, |max| length <= max)
    }

    /// `true` if every length allowed by `other` is allowed by `self`.
    pub fn contains(&self, other: &LengthRange) -> bool {
        self.min <= other.min
            && match (self.max, other.max) {
                (None, _) => true,
                (Some(_), None) => false,
                (Some(max), Some(other_max)) => other_max <= max,
            }
    }

    #[must_use]
    pub fn hull(&self, other: &LengthRange) -> LengthRange {
        LengthRange {
            min: self.min.min(other.min),
            max: match (self.max, other.max) {
                (Some(a), Some(b)) => Some(a.max(b)),
                _ => None,
            },
        }
    }

    #[must_use]
    pub fn intersect(&self, other: &LengthRange) -> LengthRange {
        LengthRange {
            min: self.min.max(other.min),
            max: match (self.max, other.max) {
                (Some(a), Some(b)) => Some(a.min(b)),
                (a, b) => a.or(b),
            },
        }
    }

    /// Lengths of a concatenation.
    #[must_use]
    pub fn add(&self, other: &LengthRange) -> LengthRange {
        LengthRange {
            min: self.min + other.min,
            max: match (self.max, other.max) {
                (Some(a), Some(b)) => Some(a + b),
                _ => None,
            },
        }
    }

    /// The non-negative whole numbers of a numeric range.
    pub fn from_number_range(range: &NumberRange) -> LengthRange {
        let range = range.to_int();
        let min = range.min.map_or(0.0, |b| b.value.max(0.0));
        let max = range.max.map(|b| b.value);
        match max {
            Some(max) if max < 0.0 => LengthRange {
                min: 1,
                max: Some(0),
            },
            Some(max) => LengthRange {
                min: min as usize,
                max: Some(max as usize),
            },
            None => LengthRange::at_least(min as usize),
        }
    }

    pub fn to_number_range(&self) -> NumberRange {
        NumberRange {
            min: Some(Bound::inclusive(self.min as f64)),
            max: self.max.map(|max| Bound::inclusive(max as f64)),
        }
    }

    /// `length: >=1` style argument, or `None` when unbounded.
    pub fn type_arg(&self) -> Option<String> {
        if self.is_unbounded() {
            return None;
        }
        let text = match self.max {
            Some(max) if max == self.min => format!("={max}"),
            Some(max) if self.min == 0 => format!("<={max}"),
            Some(max) => format!("{}...{max}", self.min),
            None => format!(">={}", self.min),
        };
        Some(format!("length: {text}"))
    }
}

#[cfg(test)]
mod tests;

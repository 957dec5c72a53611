use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// Chart windows. Each one has its own pre-materialized series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Timeframe {
    #[serde(rename = "1d")]
    OneDay,
    #[serde(rename = "1w")]
    OneWeek,
    #[default]
    #[serde(rename = "1m")]
    OneMonth,
    #[serde(rename = "3m")]
    ThreeMonths,
    #[serde(rename = "1y")]
    OneYear,
    #[serde(rename = "all")]
    All,
}

impl Timeframe {
    /// All timeframes in button order.
    pub const ALL: [Timeframe; 6] = [
        Timeframe::OneDay,
        Timeframe::OneWeek,
        Timeframe::OneMonth,
        Timeframe::ThreeMonths,
        Timeframe::OneYear,
        Timeframe::All,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Timeframe::OneDay => "1d",
            Timeframe::OneWeek => "1w",
            Timeframe::OneMonth => "1m",
            Timeframe::ThreeMonths => "3m",
            Timeframe::OneYear => "1y",
            Timeframe::All => "all",
        }
    }

    /// Button label shown above the chart.
    pub fn label(&self) -> &'static str {
        match self {
            Timeframe::OneDay => "1D",
            Timeframe::OneWeek => "1W",
            Timeframe::OneMonth => "1M",
            Timeframe::ThreeMonths => "3M",
            Timeframe::OneYear => "1Y",
            Timeframe::All => "ALL",
        }
    }
}

impl std::fmt::Display for Timeframe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Timeframe {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1d" => Ok(Timeframe::OneDay),
            "1w" => Ok(Timeframe::OneWeek),
            "1m" => Ok(Timeframe::OneMonth),
            "3m" => Ok(Timeframe::ThreeMonths),
            "1y" => Ok(Timeframe::OneYear),
            "all" => Ok(Timeframe::All),
            _ => Err(AppError::InvalidTimeframe(s.to_string())),
        }
    }
}

/// Unchecked wire shape of a series. Older payloads call the values `data`.
#[derive(Debug, Deserialize)]
struct RawSeries {
    labels: Vec<String>,
    #[serde(alias = "data")]
    values: Vec<f64>,
}

/// Chart-ready labels and values. Both always have the same length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSeries")]
pub struct Series {
    labels: Vec<String>,
    values: Vec<f64>,
}

impl Series {
    pub fn new(labels: Vec<String>, values: Vec<f64>) -> Result<Self, AppError> {
        if labels.len() != values.len() {
            return Err(AppError::SeriesLengthMismatch {
                timeframe: "unknown".to_string(),
                labels: labels.len(),
                values: values.len(),
            });
        }
        Ok(Series { labels, values })
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Last value of the series, if any.
    pub fn last(&self) -> Option<f64> {
        self.values.last().copied()
    }

    /// `(low, high)` over the values, ignoring NaN. `None` for an empty series.
    pub fn range(&self) -> Option<(f64, f64)> {
        self.values
            .iter()
            .copied()
            .filter(|v| !v.is_nan())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((low, high)) => Some((low.min(v), high.max(v))),
            })
    }
}

impl TryFrom<RawSeries> for Series {
    type Error = AppError;

    fn try_from(raw: RawSeries) -> Result<Self, Self::Error> {
        Series::new(raw.labels, raw.values)
    }
}

/// One series per timeframe, owned by the stock it describes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalSeries {
    #[serde(rename = "1d")]
    pub one_day: Series,
    #[serde(rename = "1w")]
    pub one_week: Series,
    #[serde(rename = "1m")]
    pub one_month: Series,
    #[serde(rename = "3m")]
    pub three_months: Series,
    #[serde(rename = "1y")]
    pub one_year: Series,
    #[serde(rename = "all")]
    pub all: Series,
}

impl HistoricalSeries {
    pub fn get(&self, timeframe: Timeframe) -> &Series {
        match timeframe {
            Timeframe::OneDay => &self.one_day,
            Timeframe::OneWeek => &self.one_week,
            Timeframe::OneMonth => &self.one_month,
            Timeframe::ThreeMonths => &self.three_months,
            Timeframe::OneYear => &self.one_year,
            Timeframe::All => &self.all,
        }
    }

    /// Build from `(timeframe, labels, values)` triples. Every timeframe must be present.
    pub fn from_parts<I>(parts: I) -> Result<Self, AppError>
    where
        I: IntoIterator<Item = (Timeframe, Vec<String>, Vec<f64>)>,
    {
        let mut slots: [Option<Series>; 6] = Default::default();
        for (tf, labels, values) in parts {
            let (label_count, value_count) = (labels.len(), values.len());
            let series = Series::new(labels, values).map_err(|_| AppError::SeriesLengthMismatch {
                timeframe: tf.to_string(),
                labels: label_count,
                values: value_count,
            })?;
            slots[slot_index(tf)] = Some(series);
        }

        let mut take = |tf: Timeframe| {
            slots[slot_index(tf)]
                .take()
                .ok_or_else(|| AppError::InvalidTimeframe(format!("missing series for {}", tf)))
        };

        Ok(HistoricalSeries {
            one_day: take(Timeframe::OneDay)?,
            one_week: take(Timeframe::OneWeek)?,
            one_month: take(Timeframe::OneMonth)?,
            three_months: take(Timeframe::ThreeMonths)?,
            one_year: take(Timeframe::OneYear)?,
            all: take(Timeframe::All)?,
        })
    }
}

fn slot_index(tf: Timeframe) -> usize {
    match tf {
        Timeframe::OneDay => 0,
        Timeframe::OneWeek => 1,
        Timeframe::OneMonth => 2,
        Timeframe::ThreeMonths => 3,
        Timeframe::OneYear => 4,
        Timeframe::All => 5,
    }
}

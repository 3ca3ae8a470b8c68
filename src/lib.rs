use std::{fmt, ops::Range, path::Path, str::FromStr};

use miette::Diagnostic;
use serde::Deserialize;
use thiserror::Error;
use time::{
    format_description::{well_known::Rfc3339, FormatItem},
    macros::format_description,
    Date, OffsetDateTime,
};

const DEGREE_CELSIUS: &str = "°C";

// `Saturday 19 June 2021`
const LONG_DATE: &[FormatItem<'static>] =
    format_description!("[weekday repr:long] [day] [month repr:long] [year]");
// `19 June 2021`
const SHORT_DATE: &[FormatItem<'static>] = format_description!("[day] [month repr:long] [year]");

/// Converts a Fahrenheit temperature to Celsius, rounded to one decimal
/// place. Rounds half-to-even, so converted values stay reproducible
/// across fixtures.
pub fn fahrenheit_to_celsius(fahrenheit: f64) -> f64 {
    round_tenth((fahrenheit - 32.0) / 1.8)
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round_ties_even() / 10.0
}

/// Renders a temperature with one decimal place and the `°C` suffix.
pub fn format_temperature(celsius: f64) -> String {
    format!("{celsius:.1}{DEGREE_CELSIUS}")
}

#[derive(Debug, Error, Diagnostic)]
pub enum DateError {
    #[error("Bad timestamp: {0}")]
    Parse(#[from] time::error::Parse),
    #[error("Unrepresentable date: {0}")]
    Format(#[from] time::error::Format),
}

/// Parses an offset-aware ISO-8601 timestamp like `2021-06-19T07:00:00+08:00`.
pub fn parse_timestamp(iso: &str) -> Result<OffsetDateTime, DateError> {
    Ok(OffsetDateTime::parse(iso, &Rfc3339)?)
}

/// Full weekday form used by the forecast report: `Saturday 19 June 2021`.
pub fn long_date(moment: OffsetDateTime) -> Result<String, DateError> {
    Ok(moment.format(&LONG_DATE)?)
}

/// Short form used for observation sequences: `19 June 2021`.
pub fn short_date(moment: OffsetDateTime) -> Result<String, DateError> {
    Ok(moment.format(&SHORT_DATE)?)
}

#[derive(Debug, Error, Diagnostic)]
pub enum LoadError {
    #[error("Could not read {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Document does not match the expected schema: {0}")]
    Schema(#[from] serde_json::Error),
}

fn read_document(path: &Path) -> Result<String, LoadError> {
    std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })
}

/// An n-day forecast document, the object holding a `DailyForecasts` array.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Forecast {
    pub daily_forecasts: Vec<DailyForecast>,
}

impl FromStr for Forecast {
    type Err = LoadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(serde_json::from_str(s)?)
    }
}

impl Forecast {
    /// Reads and deserializes a forecast document from disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        read_document(path.as_ref())?.parse()
    }
}

/// One day of a forecast. Temperatures are in Fahrenheit as delivered.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DailyForecast {
    pub date: String,
    pub temperature: TemperatureRange,
    pub real_feel_temperature: TemperatureRange,
    pub real_feel_temperature_shade: TemperatureRange,
    pub day: DayPart,
    pub night: DayPart,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TemperatureRange {
    pub minimum: Measurement,
    pub maximum: Measurement,
}

/// A value with its unit, e.g. `{"Value": 48.0, "Unit": "F"}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Measurement {
    pub value: f64,
    pub unit: String,
}

/// Half-day outlook, the `Day` and `Night` blocks of a daily forecast.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DayPart {
    pub long_phrase: String,
    pub rain_probability: u8,
}

/// A log of historical observations, delivered as a top-level array.
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct ObservationLog {
    pub entries: Vec<Observation>,
}

impl FromStr for ObservationLog {
    type Err = LoadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(serde_json::from_str(s)?)
    }
}

impl ObservationLog {
    /// Reads and deserializes an observation log from disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        read_document(path.as_ref())?.parse()
    }
}

/// One historical observation. Metric readings are already in Celsius.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Observation {
    pub local_observation_date_time: String,
    pub weather_text: String,
    pub is_day_time: bool,
    #[serde(rename = "UVIndex")]
    pub uv_index: u8,
    pub temperature: Reading,
    pub real_feel_temperature: Reading,
    pub temperature_summary: TemperatureSummary,
    pub precipitation_summary: PrecipitationSummary,
}

/// Metric/imperial pair as delivered for every observed quantity.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Reading {
    pub metric: Measurement,
    pub imperial: Measurement,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TemperatureSummary {
    pub past6_hour_range: SummaryRange,
    pub past12_hour_range: SummaryRange,
    pub past24_hour_range: SummaryRange,
}

impl TemperatureSummary {
    pub fn ranges(&self) -> [&SummaryRange; 3] {
        [
            &self.past6_hour_range,
            &self.past12_hour_range,
            &self.past24_hour_range,
        ]
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SummaryRange {
    pub minimum: Reading,
    pub maximum: Reading,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PrecipitationSummary {
    pub past24_hours: Reading,
}

#[derive(Debug, Error, Diagnostic)]
pub enum SummaryError {
    #[error("No entries to summarize")]
    Empty,
    #[error(transparent)]
    Date(#[from] DateError),
}

/// An extreme value and the formatted date it was first reached.
#[derive(Debug, Clone)]
pub struct Extreme {
    pub celsius: f64,
    pub date: String,
}

/// One forecast day, converted to Celsius and ready for reporting or
/// plotting.
#[derive(Debug, Clone)]
pub struct DaySummary {
    pub date: Date,
    pub long_date: String,
    pub low: f64,
    pub high: f64,
    pub real_feel_low: f64,
    pub real_feel_high: f64,
    pub real_feel_shade_low: f64,
    pub real_feel_shade_high: f64,
    pub day: DayPart,
    pub night: DayPart,
}

/// Aggregate statistics over a forecast document.
#[derive(Debug, Clone)]
pub struct ForecastSummary {
    // Days keep the input order and are never empty
    pub days: Vec<DaySummary>,
    pub lowest: Extreme,
    pub highest: Extreme,
    pub mean_low: f64,
    pub mean_high: f64,
}

impl Forecast {
    /// Folds the forecast into its summary in a single pass. Fails on an
    /// empty document, extremes and means are meaningless without at
    /// least one day.
    pub fn summary(&self) -> Result<ForecastSummary, SummaryError> {
        let mut days = Vec::with_capacity(self.daily_forecasts.len());
        for entry in &self.daily_forecasts {
            let moment = parse_timestamp(&entry.date)?;
            days.push(DaySummary {
                date: moment.date(),
                long_date: long_date(moment)?,
                low: fahrenheit_to_celsius(entry.temperature.minimum.value),
                high: fahrenheit_to_celsius(entry.temperature.maximum.value),
                real_feel_low: fahrenheit_to_celsius(entry.real_feel_temperature.minimum.value),
                real_feel_high: fahrenheit_to_celsius(entry.real_feel_temperature.maximum.value),
                real_feel_shade_low: fahrenheit_to_celsius(
                    entry.real_feel_temperature_shade.minimum.value,
                ),
                real_feel_shade_high: fahrenheit_to_celsius(
                    entry.real_feel_temperature_shade.maximum.value,
                ),
                day: entry.day.clone(),
                night: entry.night.clone(),
            });
        }

        let first = days.first().ok_or(SummaryError::Empty)?;
        let mut lowest = Extreme {
            celsius: first.low,
            date: first.long_date.clone(),
        };
        let mut highest = Extreme {
            celsius: first.high,
            date: first.long_date.clone(),
        };
        let mut sum_low = 0.0;
        let mut sum_high = 0.0;
        for day in &days {
            // Strict comparisons: ties keep the earliest day
            if day.low < lowest.celsius {
                lowest = Extreme {
                    celsius: day.low,
                    date: day.long_date.clone(),
                };
            }
            if day.high > highest.celsius {
                highest = Extreme {
                    celsius: day.high,
                    date: day.long_date.clone(),
                };
            }
            sum_low += day.low;
            sum_high += day.high;
        }

        let mean_low = round_tenth(sum_low / days.len() as f64);
        let mean_high = round_tenth(sum_high / days.len() as f64);

        Ok(ForecastSummary {
            days,
            lowest,
            highest,
            mean_low,
            mean_high,
        })
    }
}

impl ForecastSummary {
    pub fn first_date(&self) -> Date {
        self.days.first().unwrap().date
    }

    pub fn last_date(&self) -> Date {
        self.days.last().unwrap().date
    }

    /// Spread covering every plotted series, from the coldest shade low to
    /// the warmest ambient high.
    pub fn temperature_range(&self) -> Range<f64> {
        let lows = self
            .days
            .iter()
            .flat_map(|day| [day.low, day.real_feel_low, day.real_feel_shade_low]);
        let highs = self
            .days
            .iter()
            .flat_map(|day| [day.high, day.real_feel_high, day.real_feel_shade_high]);
        lows.min_by(|left, right| left.total_cmp(right)).unwrap()
            ..highs.max_by(|left, right| left.total_cmp(right)).unwrap()
    }
}

impl fmt::Display for ForecastSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} Day Overview", self.days.len())?;
        writeln!(
            f,
            "    The lowest temperature will be {}, and will occur on {}.",
            format_temperature(self.lowest.celsius),
            self.lowest.date
        )?;
        writeln!(
            f,
            "    The highest temperature will be {}, and will occur on {}.",
            format_temperature(self.highest.celsius),
            self.highest.date
        )?;
        writeln!(
            f,
            "    The average low this week is {}.",
            format_temperature(self.mean_low)
        )?;
        writeln!(
            f,
            "    The average high this week is {}.",
            format_temperature(self.mean_high)
        )?;
        writeln!(f)?;

        for day in &self.days {
            writeln!(f, "-------- {} --------", day.long_date)?;
            writeln!(f, "Minimum Temperature: {}", format_temperature(day.low))?;
            writeln!(f, "Maximum Temperature: {}", format_temperature(day.high))?;
            writeln!(f, "Daytime: {}", day.day.long_phrase)?;
            writeln!(f, "    Chance of rain:  {}%", day.day.rain_probability)?;
            writeln!(f, "Nighttime: {}", day.night.long_phrase)?;
            writeln!(f, "    Chance of rain:  {}%", day.night.rain_probability)?;
            writeln!(f)?;
        }

        Ok(())
    }
}

/// Aggregate statistics over an observation log.
#[derive(Debug, Clone)]
pub struct ObservationSummary {
    // Sequences keep the input order and are never empty
    pub dates: Vec<String>,
    pub temperatures: Vec<f64>,
    pub real_feels: Vec<f64>,
    pub summary_lows: Vec<f64>,
    pub summary_highs: Vec<f64>,
    // Every observed category in first-seen order
    pub weather_counts: Vec<(String, usize)>,
    pub rain_total: f64,
    pub daylight_hours: usize,
    pub peak_uv: u8,
    pub peak_uv_weather: String,
}

impl ObservationLog {
    /// Folds the log into its summary in a single pass. Fails on an empty
    /// log.
    pub fn summary(&self) -> Result<ObservationSummary, SummaryError> {
        let first = self.entries.first().ok_or(SummaryError::Empty)?;

        let mut dates = Vec::with_capacity(self.entries.len());
        let mut temperatures = Vec::with_capacity(self.entries.len());
        let mut real_feels = Vec::with_capacity(self.entries.len());
        let mut summary_lows = Vec::new();
        let mut summary_highs = Vec::new();
        let mut weather_counts: Vec<(String, usize)> = Vec::new();
        let mut rain_total = 0.0;
        let mut daylight_hours = 0;
        let mut peak_uv = first.uv_index;
        let mut peak_uv_weather = first.weather_text.clone();

        for entry in &self.entries {
            let moment = parse_timestamp(&entry.local_observation_date_time)?;
            dates.push(short_date(moment)?);
            temperatures.push(entry.temperature.metric.value);
            real_feels.push(entry.real_feel_temperature.metric.value);
            for range in entry.temperature_summary.ranges() {
                summary_lows.push(range.minimum.metric.value);
                summary_highs.push(range.maximum.metric.value);
            }

            match weather_counts
                .iter_mut()
                .find(|(label, _)| *label == entry.weather_text)
            {
                Some((_, count)) => *count += 1,
                None => weather_counts.push((entry.weather_text.clone(), 1)),
            }

            rain_total += entry.precipitation_summary.past24_hours.metric.value;
            if entry.is_day_time {
                daylight_hours += 1;
            }
            // Strictly greater: the first peak keeps its weather text
            if entry.uv_index > peak_uv {
                peak_uv = entry.uv_index;
                peak_uv_weather = entry.weather_text.clone();
            }
        }

        Ok(ObservationSummary {
            dates,
            temperatures,
            real_feels,
            summary_lows,
            summary_highs,
            weather_counts,
            rain_total,
            daylight_hours,
            peak_uv,
            peak_uv_weather,
        })
    }
}

impl ObservationSummary {
    /// Number of observations carrying this exact weather text.
    pub fn count_of(&self, weather_text: &str) -> usize {
        self.weather_counts
            .iter()
            .find(|(label, _)| label == weather_text)
            .map(|(_, count)| *count)
            .unwrap_or(0)
    }

    /// Spread of ambient and real-feel temperatures, for chart axes.
    pub fn temperature_range(&self) -> Range<f64> {
        let all = || self.temperatures.iter().chain(&self.real_feels).copied();
        all().min_by(|left, right| left.total_cmp(right)).unwrap()
            ..all().max_by(|left, right| left.total_cmp(right)).unwrap()
    }
}

impl fmt::Display for ObservationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} Hour Observations", self.temperatures.len())?;
        writeln!(
            f,
            "    Light rain was reported {} times, Sunny {} times.",
            self.count_of("Light rain"),
            self.count_of("Sunny")
        )?;
        writeln!(
            f,
            "    Total precipitation over the past 24 hours was {:.1}mm.",
            self.rain_total
        )?;
        writeln!(
            f,
            "    {} observations were made in daylight.",
            self.daylight_hours
        )?;
        writeln!(
            f,
            "    The peak UV index was {}, reported during {} conditions.",
            self.peak_uv, self.peak_uv_weather
        )?;
        Ok(())
    }
}

use chrono::NaiveDate;
use serde::{Serialize, Deserialize};
use std::collections::HashMap;
use std::error;
use std::fs::File;
use thiserror::Error;

const CACHE_FILE_PATH: &str = ".nav_cache";

#[derive(Debug, Error)]
pub enum NavError {
    #[error("NAV request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("NAV endpoint returned status \"{0}\"")]
    BadStatus(String),
    #[error("NAV endpoint returned no quotes")]
    EmptyData,
    #[error("malformed NAV payload: {0}")]
    Malformed(String),
}

// mfapi.in-style payload: quotes arrive newest-first, with dd-mm-YYYY
// dates and NAVs quoted as strings
#[derive(Debug, Deserialize)]
struct NavPayload {
    #[serde(default)]
    meta: NavMeta,
    #[serde(default)]
    data: Vec<NavEntry>,
    status: String,
}

#[derive(Debug, Default, Deserialize)]
struct NavMeta {
    #[serde(default)]
    scheme_name: String,
}

#[derive(Debug, Deserialize)]
struct NavEntry {
    date: String,
    nav: String,
}

#[derive(Copy, Clone, Debug, Serialize, Deserialize)]
pub struct NavPoint {
    pub date: NaiveDate,
    pub nav: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NavSeries {
    pub scheme_name: String,
    points: Vec<NavPoint>,
}

impl NavSeries {
    pub fn new(scheme_name: String, mut points: Vec<NavPoint>) -> NavSeries {
        points.sort_by(|a, b| a.date.cmp(&b.date));
        NavSeries {
            scheme_name,
            points,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn exact(&self, date: NaiveDate) -> Option<f64> {
        self.points
            .binary_search_by(|point| point.date.cmp(&date))
            .ok()
            .map(|i| self.points[i].nav)
    }

    // quote on the date itself, else the earliest later quote
    pub fn on_or_after(&self, date: NaiveDate) -> Option<&NavPoint> {
        let i = self.points.partition_point(|point| point.date < date);
        self.points.get(i)
    }

    pub fn latest(&self) -> Option<&NavPoint> {
        self.points.last()
    }
}

fn parse_payload(payload: NavPayload) -> Result<NavSeries, NavError> {
    if payload.status != "SUCCESS" {
        return Err(NavError::BadStatus(payload.status));
    }
    if payload.data.is_empty() {
        return Err(NavError::EmptyData);
    }

    let mut points = Vec::with_capacity(payload.data.len());
    for entry in payload.data.iter() {
        let date = NaiveDate::parse_from_str(&entry.date, "%d-%m-%Y")
            .map_err(|err| NavError::Malformed(format!("bad date \"{}\": {}", entry.date, err)))?;
        let nav: f64 = entry
            .nav
            .parse()
            .map_err(|_| NavError::Malformed(format!("bad NAV \"{}\"", entry.nav)))?;
        if nav <= 0f64 {
            return Err(NavError::Malformed(format!(
                "non-positive NAV {} on {}",
                nav, date
            )));
        }
        points.push(NavPoint { date, nav });
    }

    Ok(NavSeries::new(payload.meta.scheme_name, points))
}

pub struct NavProvider {
    cache: HashMap<String, NavSeries>,
}

impl NavProvider {
    pub fn new() -> NavProvider {
        let mut res = NavProvider {
            cache: HashMap::new(),
        };
        // a missing or unreadable cache file just means a cold start
        let _ = res.load();
        res
    }

    pub fn clear(&mut self) {
        self.cache.clear();
    }

    pub fn fetch(&mut self, url: &str) -> Result<NavSeries, NavError> {
        if let Some(series) = self.cache.get(url) {
            return Ok(series.clone());
        }

        println!("--- running NAV query: {}", url);

        let payload: NavPayload = reqwest::blocking::Client::new().get(url).send()?.json()?;
        let series = parse_payload(payload)?;

        println!("--- success: {} quotes", series.len());

        self.cache.insert(url.to_string(), series.clone());
        if let Err(err) = self.save() {
            println!("--- could not save NAV cache: {}", err);
        }

        Ok(series)
    }

    fn load(&mut self) -> Result<(), Box<dyn error::Error>> {
        self.clear();

        let file = std::fs::File::open(CACHE_FILE_PATH)?;
        let data = ::serde_yaml::from_reader(file)?;
        self.cache = data;

        Ok(())
    }

    fn save(&self) -> Result<(), Box<dyn error::Error>> {
        ::serde_yaml::to_writer(&File::create(CACHE_FILE_PATH)?, &self.cache)?;
        Ok(())
    }
}

impl Drop for NavProvider {
    fn drop(&mut self) {
        if let Err(err) = self.save() {
            println!("--- could not save NAV cache: {}", err);
        }
    }
}

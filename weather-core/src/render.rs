use std::{fmt::Write as _, io};

use crate::model::{Location, Quantity, WeatherMeasurement};

const SEPARATOR: &str = "------------------------------------------------";

/// Width of the widest label, "Apparent Temperature: ".
const LABEL_WIDTH: usize = 22;

/// Report text for `location`, one reading per line in fixed order.
pub fn render(location: &Location, m: &WeatherMeasurement) -> String {
    let rows: [(&str, &Quantity); 9] = [
        ("Temperature", &m.temperature),
        ("Apparent Temperature", &m.apparent_temperature),
        ("Humidity", &m.relative_humidity),
        ("Precipitation", &m.precipitation),
        ("Cloud Cover", &m.cloud_cover),
        ("Pressure", &m.surface_pressure),
        ("Wind Speed", &m.wind_speed),
        ("Wind Direction", &m.wind_direction),
        ("Wind Gusts", &m.wind_gusts),
    ];

    let mut text = format!("Weather for {}\n{SEPARATOR}\n", location.label());
    for (label, quantity) in rows {
        let label = format!("{label}:");
        // Writing into a String cannot fail.
        let _ = writeln!(text, "{label:<LABEL_WIDTH$}{quantity}");
    }
    text
}

pub fn write_report<W: io::Write>(
    out: &mut W,
    location: &Location,
    measurement: &WeatherMeasurement,
) -> io::Result<()> {
    out.write_all(render(location, measurement).as_bytes())?;
    out.flush()
}

/// Human-readable phrase for a WMO weather interpretation code.
pub fn describe(code: i32) -> &'static str {
    match code {
        0 => "Clear sky",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45 => "Foggy",
        51 => "Light drizzle",
        53 => "Moderate drizzle",
        55 => "Dense drizzle",
        61 => "Slight rain",
        63 => "Moderate rain",
        65 => "Heavy rain",
        71 => "Slight snow",
        73 => "Moderate snow",
        75 => "Heavy snow",
        80 => "Rain showers",
        81 => "Moderate showers",
        82 => "Violent showers",
        95 => "Thunderstorm",
        96 => "Thunderstorm + hail",
        99 => "Thunderstorm + heavy hail",
        _ => "Unknown",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeatherType {
    Clear,
    PartlyCloudy,
    Cloudy,
    Fog,
    Rain,
    Snow,
    Thunderstorm,
    Unknown,
}

impl WeatherType {
    pub fn from_code(code: i32) -> Self {
        match code {
            0 | 1 => WeatherType::Clear,
            2 => WeatherType::PartlyCloudy,
            3 => WeatherType::Cloudy,
            45 | 48 => WeatherType::Fog,
            51..=67 | 80..=82 => WeatherType::Rain,
            71..=77 | 85 | 86 => WeatherType::Snow,
            95..=99 => WeatherType::Thunderstorm,
            _ => WeatherType::Unknown,
        }
    }

    /// Single glyph shown on forecast tiles.
    pub fn glyph(self) -> &'static str {
        match self {
            WeatherType::Clear => "☀",
            WeatherType::PartlyCloudy => "⛅",
            WeatherType::Cloudy => "☁",
            WeatherType::Fog => "〰",
            WeatherType::Rain => "☔",
            WeatherType::Snow => "❄",
            WeatherType::Thunderstorm => "⚡",
            WeatherType::Unknown => "?",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &[(i32, &str)] = &[
        (0, "Clear sky"),
        (1, "Mainly clear"),
        (2, "Partly cloudy"),
        (3, "Overcast"),
        (45, "Foggy"),
        (51, "Light drizzle"),
        (53, "Moderate drizzle"),
        (55, "Dense drizzle"),
        (61, "Slight rain"),
        (63, "Moderate rain"),
        (65, "Heavy rain"),
        (71, "Slight snow"),
        (73, "Moderate snow"),
        (75, "Heavy snow"),
        (80, "Rain showers"),
        (81, "Moderate showers"),
        (82, "Violent showers"),
        (95, "Thunderstorm"),
        (96, "Thunderstorm + hail"),
        (99, "Thunderstorm + heavy hail"),
    ];

    #[test]
    fn describe_returns_documented_phrase_for_known_codes() {
        for (code, phrase) in TABLE {
            assert_eq!(describe(*code), *phrase, "code {code}");
        }
    }

    #[test]
    fn describe_returns_unknown_for_everything_else() {
        for code in -5..=120 {
            if TABLE.iter().any(|(known, _)| *known == code) {
                continue;
            }
            assert_eq!(describe(code), "Unknown", "code {code}");
        }
        assert_eq!(describe(i32::MAX), "Unknown");
        assert_eq!(describe(i32::MIN), "Unknown");
    }

    #[test]
    fn weather_type_groups_codes_by_condition() {
        assert_eq!(WeatherType::from_code(0), WeatherType::Clear);
        assert_eq!(WeatherType::from_code(2), WeatherType::PartlyCloudy);
        assert_eq!(WeatherType::from_code(3), WeatherType::Cloudy);
        assert_eq!(WeatherType::from_code(45), WeatherType::Fog);
        assert_eq!(WeatherType::from_code(53), WeatherType::Rain);
        assert_eq!(WeatherType::from_code(81), WeatherType::Rain);
        assert_eq!(WeatherType::from_code(75), WeatherType::Snow);
        assert_eq!(WeatherType::from_code(96), WeatherType::Thunderstorm);
        assert_eq!(WeatherType::from_code(42), WeatherType::Unknown);
    }
}

use super::Rule;
use crate::models::{AdvisorySignal, CurrentConditions, ForecastEntry, Severity, WeatherCondition};

/// Entries at the head of the window that count as "soon" (about 48 hours)
const SOON_ENTRIES: usize = 2;

/// Rain timing rule for spraying and irrigation.
///
/// - Rain in either of the next two daily entries: delay spraying (Warning)
/// - No rain anywhere in the window: good spraying/irrigation conditions (Info)
/// - Rain later in the window but not soon: no signal
pub struct RainDelayRule;

impl Rule for RainDelayRule {
    fn id(&self) -> &'static str {
        "rain_delay"
    }

    fn name(&self) -> &'static str {
        "Rain Timing"
    }

    fn evaluate(&self, conditions: &CurrentConditions) -> Option<AdvisorySignal> {
        let is_rain = |e: &ForecastEntry| e.condition == WeatherCondition::Rain;

        let rain_soon = conditions.window.iter().take(SOON_ENTRIES).any(is_rain);
        let rain_expected = conditions.window.iter().any(is_rain);

        if rain_soon {
            Some(AdvisorySignal::new(
                Severity::Warning,
                "Rain expected in next 48 hours. Delay spraying pesticides/fertilizers.",
                self.id(),
            ))
        } else if !rain_expected {
            Some(AdvisorySignal::new(
                Severity::Info,
                "No rain forecast. Suitable for irrigation and spraying.",
                self.id(),
            ))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::rules::fixtures::{conditions, snapshot, window};
    use WeatherCondition::{Clear, Clouds, Drizzle, Rain};

    fn eval(entries: &[WeatherCondition]) -> Option<AdvisorySignal> {
        RainDelayRule.evaluate(&conditions(snapshot(25.0, 50.0, 1.0), window(entries)))
    }

    #[test]
    fn rain_tomorrow_delays_spraying() {
        let signal = eval(&[Rain, Clear, Clear, Clear, Clear]).unwrap();
        assert_eq!(signal.severity, Severity::Warning);
        assert!(signal.message.contains("Delay spraying"));
        assert_eq!(signal.source_rule, "rain_delay");
    }

    #[test]
    fn rain_second_entry_is_still_soon() {
        let signal = eval(&[Clouds, Rain, Clear]).unwrap();
        assert_eq!(signal.severity, Severity::Warning);
    }

    #[test]
    fn dry_window_is_suitable() {
        let signal = eval(&[Clear, Clouds, Clear, Clear, Clouds]).unwrap();
        assert_eq!(signal.severity, Severity::Info);
        assert!(signal.message.contains("No rain forecast"));
    }

    #[test]
    fn rain_later_only_yields_nothing() {
        assert!(eval(&[Clear, Clear, Clouds, Rain, Clear]).is_none());
    }

    #[test]
    fn drizzle_is_not_rain() {
        let signal = eval(&[Drizzle, Drizzle]).unwrap();
        assert_eq!(signal.severity, Severity::Info);
    }

    #[test]
    fn empty_window_counts_as_dry() {
        let signal = eval(&[]).unwrap();
        assert_eq!(signal.severity, Severity::Info);
    }
}

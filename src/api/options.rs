use std::convert::TryFrom;
use tokio::time::Duration;

#[derive(Clone, Default)]
pub struct MonitorOptions {
    /// How often pending events are folded into the published cluster model. Defaults to 5s.
    pub consolidation_period: Option<Duration>,
}

pub(super) struct MonitorOptionsValidated {
    pub consolidation_period: Duration,
}

impl MonitorOptionsValidated {
    fn validate(&self) -> Result<(), &'static str> {
        if self.consolidation_period == Duration::from_secs(0) {
            return Err("Consolidation period must be greater than zero");
        }
        if self.consolidation_period > Duration::from_secs(60 * 60) {
            return Err("Consolidation period must be at most one hour");
        }

        Ok(())
    }
}

impl TryFrom<MonitorOptions> for MonitorOptionsValidated {
    type Error = &'static str;

    fn try_from(options: MonitorOptions) -> Result<Self, Self::Error> {
        let values = MonitorOptionsValidated {
            consolidation_period: options.consolidation_period.unwrap_or(Duration::from_secs(5)),
        };

        values.validate()?;
        Ok(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let validated = MonitorOptionsValidated::try_from(MonitorOptions::default()).unwrap();

        assert_eq!(validated.consolidation_period, Duration::from_secs(5));
    }

    #[test]
    fn custom_period() {
        let options = MonitorOptions {
            consolidation_period: Some(Duration::from_millis(250)),
        };

        let validated = MonitorOptionsValidated::try_from(options).unwrap();

        assert_eq!(validated.consolidation_period, Duration::from_millis(250));
    }

    #[test]
    fn illegal_periods() {
        for period in &[Duration::from_secs(0), Duration::from_secs(60 * 60 + 1)] {
            let options = MonitorOptions {
                consolidation_period: Some(*period),
            };

            assert!(MonitorOptionsValidated::try_from(options).is_err());
        }
    }
}

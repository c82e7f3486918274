use chrono::{Local, NaiveDate, NaiveDateTime};

/// Source de l'heure murale locale.
/// Toutes les décisions "aujourd'hui" passent par ce trait.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;

    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Horloge figée, déplaçable à la main dans les tests
#[cfg(test)]
pub struct FixedClock {
    now: std::sync::Mutex<NaiveDateTime>,
}

#[cfg(test)]
impl FixedClock {
    pub fn at(now: NaiveDateTime) -> Self {
        Self {
            now: std::sync::Mutex::new(now),
        }
    }

    pub fn set(&self, now: NaiveDateTime) {
        *self.now.lock().unwrap() = now;
    }
}

#[cfg(test)]
impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        *self.now.lock().unwrap()
    }
}

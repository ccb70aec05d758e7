//! Fixed-window rolling average

/// Rolling average over a fixed number of samples, backed by a ring buffer.
/// Updates never fail and accept any value; the average over an empty
/// window is zero.
#[derive(Debug, Clone)]
pub struct RollingAverage {
    samples: Vec<f64>,
    capacity: usize,
    next: usize,
    sum: f64,
}

impl RollingAverage {
    pub fn new(window_size: usize) -> Self {
        Self {
            samples: Vec::with_capacity(window_size.max(1)),
            capacity: window_size.max(1),
            next: 0,
            sum: 0.0,
        }
    }

    /// Push a sample, evicting the oldest one once the window is full
    pub fn update(&mut self, value: f64) {
        if self.samples.len() < self.capacity {
            self.samples.push(value);
        } else {
            self.sum -= self.samples[self.next];
            self.samples[self.next] = value;
        }
        self.sum += value;
        self.next = (self.next + 1) % self.capacity;
    }

    pub fn average(&self) -> f64 {
        if self.samples.is_empty() {
            0.0
        } else {
            self.sum / self.samples.len() as f64
        }
    }

    pub fn window_size(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.samples.len() == self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn average_of_empty_window_is_zero() {
        let average = RollingAverage::new(5);
        assert_relative_eq!(average.average(), 0.0);
    }

    #[test]
    fn partial_window_averages_present_samples() {
        let mut average = RollingAverage::new(4);
        average.update(1.0);
        average.update(0.5);
        assert_relative_eq!(average.average(), 0.75);
        assert!(!average.is_full());
    }

    #[test]
    fn full_window_evicts_oldest_sample() {
        let mut average = RollingAverage::new(3);
        for value in [1.0, 2.0, 3.0, 4.0] {
            average.update(value);
        }
        // window now holds 2, 3, 4
        assert_relative_eq!(average.average(), 3.0);
        assert!(average.is_full());
    }

    #[test]
    fn constant_input_settles_to_that_constant() {
        let mut average = RollingAverage::new(10);
        for _ in 0..50 {
            average.update(1.0 / 3.0);
        }
        assert_relative_eq!(average.average(), 1.0 / 3.0, epsilon = 1e-12);
    }
}

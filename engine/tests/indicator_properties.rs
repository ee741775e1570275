//! Property tests for the indicator core.
//!
//! Uses proptest to verify, over random bar series:
//! 1. Oscillator bounds: RSI, %K and %D stay within [0, 100]
//! 2. Band ordering: lower <= middle <= upper
//! 3. MACD histogram identity
//! 4. Output lengths and timestamp alignment
//! 5. Insufficient-data boundaries

use engine::indicators::bollinger::bollinger_bands;
use engine::indicators::kd::stochastic_values;
use engine::indicators::macd::macd_values;
use engine::indicators::moving_average::{ema, sma};
use engine::indicators::rsi::rsi_values;
use engine::indicators::{
    BandsConfig, BollingerBands, IndicatorCalculator, Macd, Rsi, Stochastic, StochasticConfig,
    TrendConfig,
};
use engine::{BarSeries, EngineError};
use proptest::prelude::*;
use shared::models::Bar;

const EPS: f64 = 1e-9;

// ── Strategies ───────────────────────────────────────────────────────

fn arb_closes(min: usize, max: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec((1.0..1000.0_f64).prop_map(|p| (p * 100.0).round() / 100.0), min..max)
}

/// Bars that honour low <= open, close <= high, one hour apart.
fn arb_bars(min: usize, max: usize) -> impl Strategy<Value = Vec<Bar>> {
    let raw_bar = (10.0..500.0_f64, 0.0..20.0_f64, 0.0..1.0_f64, 0.0..1.0_f64);
    prop::collection::vec(raw_bar, min..max).prop_map(|raw| {
        raw.into_iter()
            .enumerate()
            .map(|(i, (low, range, open_frac, close_frac))| {
                let high = low + range;
                Bar::new(
                    i as i64 * 3_600_000,
                    low + range * open_frac,
                    high,
                    low,
                    low + range * close_frac,
                )
            })
            .collect()
    })
}

fn series_from_closes(closes: &[f64]) -> BarSeries {
    BarSeries::new(
        closes
            .iter()
            .enumerate()
            .map(|(i, &c)| Bar::new(i as i64 * 60_000, c, c, c, c))
            .collect(),
    )
    .unwrap()
}

// ── 1. Oscillator bounds ─────────────────────────────────────────────

proptest! {
    #[test]
    fn rsi_stays_in_bounds(closes in arb_closes(16, 120), period in 1usize..15) {
        for value in rsi_values(&closes, period).unwrap() {
            prop_assert!(value.is_finite());
            prop_assert!((0.0..=100.0).contains(&value), "rsi {}", value);
        }
    }

    #[test]
    fn kd_stays_in_bounds(bars in arb_bars(14, 120), period in 1usize..14) {
        let highs: Vec<f64> = bars.iter().map(|b| b.high).collect();
        let lows: Vec<f64> = bars.iter().map(|b| b.low).collect();
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let config = StochasticConfig { period };
        for point in stochastic_values(&highs, &lows, &closes, &config).unwrap() {
            prop_assert!(point.k.is_finite() && point.d.is_finite());
            prop_assert!(point.k >= -EPS && point.k <= 100.0 + EPS, "k {}", point.k);
            prop_assert!(point.d >= -EPS && point.d <= 100.0 + EPS, "d {}", point.d);
        }
    }

    #[test]
    fn rising_prices_pin_rsi_to_100(
        start in 1.0..100.0_f64,
        steps in prop::collection::vec(0.01..5.0_f64, 20..60),
    ) {
        let mut closes = vec![start];
        for step in steps {
            let last = *closes.last().unwrap();
            closes.push(last + step);
        }
        for value in rsi_values(&closes, 14).unwrap() {
            prop_assert_eq!(value, 100.0);
        }
    }
}

// ── 2. Band ordering ─────────────────────────────────────────────────

proptest! {
    #[test]
    fn bands_are_ordered(
        closes in arb_closes(20, 120),
        period in 1usize..20,
        multiplier in 0.1..4.0_f64,
    ) {
        let config = BandsConfig { period, multiplier };
        let bands = bollinger_bands(&closes, &config).unwrap();
        prop_assert_eq!(bands.len(), closes.len() - period + 1);
        for band in bands {
            prop_assert!(band.lower <= band.middle && band.middle <= band.upper);
        }
    }

    #[test]
    fn constant_window_collapses_bands(value in 1.0..1000.0_f64, len in 5usize..40) {
        let closes = vec![value; len];
        for band in bollinger_bands(&closes, &BandsConfig { period: 5, multiplier: 2.0 }).unwrap() {
            prop_assert!((band.upper - band.lower).abs() < EPS * value);
            prop_assert!((band.middle - value).abs() < EPS * value);
        }
    }
}

// ── 3. Moving averages and MACD identities ───────────────────────────

proptest! {
    #[test]
    fn sma_of_constant_is_constant(
        value in -1000.0..1000.0_f64,
        len in 1usize..50,
        period in 1usize..10,
    ) {
        let values = vec![value; len];
        for (i, avg) in sma(&values, period).unwrap().into_iter().enumerate() {
            match avg {
                Some(avg) => {
                    prop_assert!(i + 1 >= period);
                    prop_assert!((avg - value).abs() <= EPS * value.abs().max(1.0));
                }
                None => prop_assert!(i + 1 < period),
            }
        }
    }

    #[test]
    fn ema_is_seeded_and_constant_is_fixed_point(
        values in arb_closes(1, 60),
        value in 1.0..1000.0_f64,
        period in 1usize..30,
    ) {
        prop_assert_eq!(ema(&values, period).unwrap()[0], values[0]);
        for v in ema(&vec![value; 40], period).unwrap() {
            prop_assert!((v - value).abs() <= EPS * value);
        }
    }

    #[test]
    fn macd_histogram_identity(closes in arb_closes(1, 150)) {
        let points = macd_values(&closes, &TrendConfig::default()).unwrap();
        prop_assert_eq!(points.len(), closes.len());
        for point in points {
            prop_assert_eq!(point.histogram, point.line - point.signal_line);
        }
    }
}

// ── 4. Lengths and alignment ─────────────────────────────────────────

proptest! {
    #[test]
    fn calculators_align_to_bar_timestamps(bars in arb_bars(30, 100)) {
        let series = BarSeries::new(bars).unwrap();
        let n = series.len();
        let timestamps = series.timestamps();

        let rsi = Rsi::new(14).calculate(&series).unwrap();
        prop_assert_eq!(rsi.len(), n - 14 - 1);
        prop_assert_eq!(rsi[0].timestamp, timestamps[15]);

        let bands = BollingerBands::default().calculate(&series).unwrap();
        prop_assert_eq!(bands.len(), n - 20 + 1);
        prop_assert_eq!(bands[0].timestamp, timestamps[19]);

        let kd = Stochastic::default().calculate(&series).unwrap();
        prop_assert_eq!(kd.len(), n - 14 + 1);
        prop_assert_eq!(kd[0].timestamp, timestamps[13]);

        let macd = Macd::default().calculate(&series).unwrap();
        prop_assert_eq!(macd.len(), n);
        prop_assert_eq!(macd.last().unwrap().timestamp, *timestamps.last().unwrap());
    }
}

// ── 5. Boundaries ────────────────────────────────────────────────────

#[test]
fn short_series_report_insufficient_data() {
    let series = series_from_closes(&[100.0; 14]);
    assert!(matches!(
        Rsi::new(14).calculate(&series),
        Err(EngineError::InsufficientData { required: 15, actual: 14 })
    ));
    assert!(matches!(
        BollingerBands::default().calculate(&series),
        Err(EngineError::InsufficientData { required: 20, actual: 14 })
    ));
    assert!(Stochastic::default().calculate(&series).is_ok());
    assert!(matches!(
        Stochastic::default().calculate(&series_from_closes(&[100.0; 13])),
        Err(EngineError::InsufficientData { required: 14, actual: 13 })
    ));
}

#[test]
fn twenty_constant_closes_give_one_collapsed_band() {
    let points = BollingerBands::new(BandsConfig { period: 20, multiplier: 2.0 })
        .calculate(&series_from_closes(&[100.0; 20]))
        .unwrap();
    assert_eq!(points.len(), 1);
    let band = points[0].value;
    assert_eq!((band.upper, band.middle, band.lower, band.price), (100.0, 100.0, 100.0, 100.0));
}

#[test]
fn misordered_bars_are_rejected_before_any_indicator_runs() {
    let bars = vec![Bar::new(2, 1.0, 1.0, 1.0, 1.0), Bar::new(1, 1.0, 1.0, 1.0, 1.0)];
    assert!(matches!(
        BarSeries::new(bars),
        Err(EngineError::NonMonotonicTimestamps { index: 1, .. })
    ));
}

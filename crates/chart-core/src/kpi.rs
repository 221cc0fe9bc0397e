// File: crates/chart-core/src/kpi.rs
// Summary: KPI cards derived from the backtest summary (value, tone, plain-language explanation).

use crate::format::FieldFormat;
use crate::record::BacktestResult;
use crate::theme::Tone;

/// Summary keys as produced by the backtest service.
pub mod keys {
    pub const TOTAL_RETURN: &str = "Total Return(%)";
    pub const ANNUALIZED_RETURN: &str = "Annualized Return(%)";
    pub const ANNUALIZED_VOLATILITY: &str = "Annualized Volatility (%)";
    pub const MAX_DRAWDOWN: &str = "Max Drawdown (%)";
    pub const SHARPE_RATIO: &str = "Sharpe Ratio";
    pub const TRADE_COUNT: &str = "Trade Count";
    pub const WINNING_DAYS: &str = "Winning Days (%)";
    pub const LOSING_DAYS: &str = "Losing Days (%)";
}

#[derive(Clone, Debug, PartialEq)]
pub struct KpiCard {
    pub title: &'static str,
    pub value: String,
    pub tone: Tone,
    pub explanation: String,
}

/// Summary metrics; absent or non-numeric entries read as 0.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Summary {
    pub total_return: f64,
    pub annualized_return: f64,
    pub annualized_volatility: f64,
    pub max_drawdown: f64,
    pub sharpe_ratio: f64,
    pub trade_count: f64,
    pub winning_days: f64,
    pub losing_days: f64,
}

impl Summary {
    pub fn from_result(result: &BacktestResult) -> Self {
        let get = |k: &str| result.summary_value(k).filter(|v| v.is_finite()).unwrap_or(0.0);
        Self {
            total_return: get(keys::TOTAL_RETURN),
            annualized_return: get(keys::ANNUALIZED_RETURN),
            annualized_volatility: get(keys::ANNUALIZED_VOLATILITY),
            max_drawdown: get(keys::MAX_DRAWDOWN),
            sharpe_ratio: get(keys::SHARPE_RATIO),
            trade_count: get(keys::TRADE_COUNT),
            winning_days: get(keys::WINNING_DAYS),
            losing_days: get(keys::LOSING_DAYS),
        }
    }
}

/// First text whose threshold `v` reaches (`v >= t`), else `fallback`.
fn at_least(v: f64, ladder: &[(f64, &'static str)], fallback: &'static str) -> &'static str {
    ladder.iter().find(|(t, _)| v >= *t).map_or(fallback, |(_, s)| *s)
}

/// First text whose threshold `v` stays under (`v <= t`), else `fallback`.
fn at_most(v: f64, ladder: &[(f64, &'static str)], fallback: &'static str) -> &'static str {
    ladder.iter().find(|(t, _)| v <= *t).map_or(fallback, |(_, s)| *s)
}

fn sign_tone(v: f64) -> Tone {
    if v >= 0.0 { Tone::Positive } else { Tone::Negative }
}

pub fn kpi_cards(result: &BacktestResult) -> Vec<KpiCard> {
    cards_for(&Summary::from_result(result))
}

pub fn cards_for(s: &Summary) -> Vec<KpiCard> {
    vec![
        total_return(s.total_return),
        annualized_return(s.annualized_return),
        volatility(s.annualized_volatility),
        drawdown(s.max_drawdown),
        sharpe(s.sharpe_ratio),
        trades(s.trade_count),
        winning_days(s.winning_days),
        losing_days(s.losing_days),
    ]
}

fn total_return(v: f64) -> KpiCard {
    let verdict = at_least(
        v,
        &[
            (30.0, "Amazing! Your money more than doubled in some cases."),
            (15.0, "Great job! Your investment performed really well."),
            (5.0, "Not bad - you made some money."),
            (0.0, "You made a small profit."),
            (-10.0, "You lost some money, but it's recoverable."),
        ],
        "Significant loss - this strategy needs work.",
    );
    let verb = if v >= 0.0 { "grew" } else { "shrank" };
    KpiCard {
        title: "Total Return",
        value: format!("{v:.2}%"),
        tone: sign_tone(v),
        explanation: format!("Your investment {verb} by {:.2}% overall. {verdict}", v.abs()),
    }
}

fn annualized_return(v: f64) -> KpiCard {
    let verdict = at_least(
        v,
        &[
            (15.0, "That's fantastic - much better than keeping money in a bank!"),
            (8.0, "Pretty good - beats most savings accounts and many investments."),
            (0.0, "Modest gains, but at least you're not losing money."),
        ],
        "You'd lose money each year with this approach.",
    );
    let verb = if v >= 0.0 { "make" } else { "lose" };
    KpiCard {
        title: "Annualized Return",
        value: format!("{v:.2}%"),
        tone: sign_tone(v),
        explanation: format!(
            "If you kept this strategy for a full year, you'd expect to {verb} about {:.1}% per year. {verdict}",
            v.abs()
        ),
    }
}

fn volatility(v: f64) -> KpiCard {
    // tone uses fractional cut-offs while the text uses percent ones
    let tone = if v <= 0.2 { Tone::Positive } else if v <= 0.5 { Tone::Caution } else { Tone::Negative };
    let verdict = at_most(
        v,
        &[
            (15.0, "Very steady - like a calm ride with few surprises."),
            (25.0, "Moderate ups and downs - some bumpy days but manageable."),
            (40.0, "Quite bumpy - expect some wild swings in your account value."),
        ],
        "Very wild ride - your account could swing dramatically day to day.",
    );
    KpiCard {
        title: "Annualized Volatility",
        value: format!("{v:.2}%"),
        tone,
        explanation: format!("Your returns swing up and down by about {v:.1}% each year. {verdict}"),
    }
}

fn drawdown(v: f64) -> KpiCard {
    let dd = v.abs();
    let verdict = at_most(
        dd,
        &[
            (5.0, "Excellent! You barely lost any money during bad times."),
            (15.0, "Good control - your worst loss was manageable."),
            (25.0, "Moderate pain - you lost a significant chunk but recovered."),
            (40.0, "Tough times - you lost a lot at your worst point."),
        ],
        "Brutal losses - this would be very hard to stomach.",
    );
    KpiCard {
        title: "Max Drawdown",
        value: format!("{dd:.2}%"),
        tone: Tone::Negative,
        explanation: format!("At your worst moment, you were down {dd:.1}% from your peak. {verdict}"),
    }
}

fn sharpe(v: f64) -> KpiCard {
    let tone = if v >= 1.0 { Tone::Positive } else if v >= 0.0 { Tone::Caution } else { Tone::Negative };
    let verdict = at_least(
        v,
        &[
            (2.0, "exceptional value - great returns for the risk you took!"),
            (1.0, "good value - your profits justified the ups and downs."),
            (0.5, "okay value - but you might find less stressful ways to make money."),
            (0.0, "poor value - lots of stress for little gain."),
        ],
        "terrible value - you lost money AND had a stressful ride.",
    );
    KpiCard {
        title: "Sharpe Ratio",
        value: format!("{v:.3}"),
        tone,
        explanation: format!("This measures if your gains were worth the stress. At {v:.2}, you got {verdict}"),
    }
}

fn trades(v: f64) -> KpiCard {
    let verdict = at_least(
        v,
        &[
            (1000.0, "Very active - you were buying/selling almost daily. Watch out for fees!"),
            (250.0, "Quite active - several trades per week on average."),
            (100.0, "Moderately active - a few trades per week."),
            (50.0, "Somewhat active - maybe one trade per week."),
            (20.0, "Pretty quiet - just a few trades per month."),
        ],
        "Very few trades - this strategy doesn't trade much.",
    );
    let count = FieldFormat::Integer.apply(v);
    KpiCard {
        title: "Total Trades",
        value: count.clone(),
        tone: Tone::Info,
        explanation: format!("You made {count} trades in total. {verdict}"),
    }
}

fn winning_days(v: f64) -> KpiCard {
    let verdict = at_least(
        v,
        &[
            (70.0, "Incredible! You won most days - very consistent strategy."),
            (55.0, "Great! You won more often than you lost."),
            (45.0, "Balanced - you won almost as often as you lost."),
            (35.0, "Tough - you lost more often than you won, but big wins can still make money."),
        ],
        "Very challenging - you lost money most days.",
    );
    KpiCard {
        title: "Winning Days",
        value: format!("{v:.1}%"),
        tone: if v >= 0.5 { Tone::Positive } else { Tone::Caution },
        explanation: format!("You made money on {v:.0}% of your trading days. {verdict}"),
    }
}

fn losing_days(v: f64) -> KpiCard {
    let verdict = at_most(
        v,
        &[
            (30.0, "Excellent! You rarely had bad days."),
            (45.0, "Pretty good - losing days were manageable."),
            (55.0, "Balanced - about half your days were down days."),
            (65.0, "Challenging - you had more losing days than winning ones."),
        ],
        "Very tough - most of your trading days ended in losses.",
    );
    KpiCard {
        title: "Losing Days",
        value: format!("{v:.1}%"),
        tone: if v <= 0.5 { Tone::Positive } else { Tone::Negative },
        explanation: format!("You lost money on {v:.0}% of your trading days. {verdict}"),
    }
}

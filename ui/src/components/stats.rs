use geom::{Duration, Time, UnitFmt};
use widgetry::{Color, EventCtx, Line, LinePlot, PlotOptions, Series, Text, TextExt, Widget};

use model::stats::{fmt_distance, fmt_duration, fmt_speed};
use model::{SpeedBand, Trip, TripStats};

pub fn band_color(band: SpeedBand) -> Color {
    match band {
        SpeedBand::Low => Color::hex("#22C55E"),
        SpeedBand::Medium => Color::hex("#EAB308"),
        SpeedBand::High => Color::hex("#EF4444"),
    }
}

pub fn speed_gauge(ctx: &mut EventCtx, kmh: f64) -> Widget {
    let color = band_color(SpeedBand::of(kmh));
    Widget::col(vec![
        Line("Current Speed").secondary().into_widget(ctx),
        Widget::row(vec![
            Line(format!("{:.0}", kmh))
                .big_monospaced()
                .fg(color)
                .into_widget(ctx),
            Line("km/h").secondary().into_widget(ctx).centered_vert(),
        ]),
    ])
    .bg(color.alpha(0.1))
    .padding(16)
}

pub fn stat_grid(ctx: &mut EventCtx, stats: &TripStats) -> Widget {
    let cell = |ctx: &mut EventCtx, label: &str, value: String| {
        Text::from_multiline(vec![Line(label).secondary(), Line(value).small_heading()])
            .into_widget(ctx)
            .padding(8)
    };

    Widget::col(vec![
        Widget::row(vec![
            cell(ctx, "Distance", fmt_distance(stats.distance)),
            cell(ctx, "Duration", fmt_duration(stats.duration)),
        ])
        .evenly_spaced(),
        Widget::row(vec![
            cell(ctx, "Avg Speed", fmt_speed(stats.avg_speed)),
            cell(ctx, "Max Speed", fmt_speed(stats.max_speed)),
        ])
        .evenly_spaced(),
    ])
}

/// Speed over the whole trip, regardless of how much has been played.
pub fn speed_chart(ctx: &mut EventCtx, trip: &Trip) -> Widget {
    let (start, _) = match trip.time_span() {
        Some(span) => span,
        None => return Widget::nothing(),
    };

    let pts = trip
        .samples
        .iter()
        .map(|s| {
            // The plot can't go before midnight
            let elapsed = Duration::seconds((s.timestamp - start).max(0.0));
            (Time::START_OF_DAY + elapsed, s.speed.max(0.0).round() as usize)
        })
        .collect();

    Widget::col(vec![
        Line("Speed Over Time").small_heading().into_widget(ctx),
        LinePlot::new_widget(
            ctx,
            "speed",
            vec![Series {
                label: "km/h".to_string(),
                color: Color::hex("#21D3F5"),
                pts,
            }],
            PlotOptions::fixed(),
            UnitFmt::metric(),
        ),
    ])
    .section(ctx)
}

pub fn no_data(ctx: &mut EventCtx) -> Widget {
    Widget::col(vec![
        Line("No data").small_heading().into_widget(ctx),
        "Load a CSV with timestamp,latitude,longitude,speed rows to replay a trip."
            .text_widget(ctx),
    ])
    .section(ctx)
}

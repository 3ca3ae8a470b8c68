use plotters::prelude::*;
use weather_report::{DaySummary, Forecast};

fn main() {
    let input = std::env::args()
        .nth(1)
        .unwrap_or_else(|| String::from("data/forecast_5days_a.json"));
    println!("opening {input}");
    let output = format!("{input}.png");

    let summary = Forecast::from_path(&input).unwrap().summary().unwrap();

    let first = naive_date(summary.first_date());
    let last = naive_date(summary.last_date());

    let root = BitMapBackend::new(&output, (1920, 1080)).into_drawing_area();
    root.fill(&WHITE).unwrap();
    let mut chart = ChartBuilder::on(&root)
        .caption(
            "Daily Minimum and Maximum Temperature",
            ("sans-serif", 100).into_font(),
        )
        .margin(5)
        .x_label_area_size(80)
        .y_label_area_size(80)
        .build_cartesian_2d(first..last.succ_opt().unwrap(), summary.temperature_range())
        .unwrap();

    chart.configure_mesh().draw().unwrap();

    let series: [(&str, fn(&DaySummary) -> f64, RGBAColor); 6] = [
        ("Daily Minimums", |day| day.low, BLUE.to_rgba()),
        ("Daily Maximums", |day| day.high, RED.to_rgba()),
        ("Real Feel Minimums", |day| day.real_feel_low, BLUE.mix(0.5)),
        ("Real Feel Maximums", |day| day.real_feel_high, RED.mix(0.5)),
        (
            "Real Feel Shade Minimums",
            |day| day.real_feel_shade_low,
            BLUE.mix(0.2),
        ),
        (
            "Real Feel Shade Maximums",
            |day| day.real_feel_shade_high,
            RED.mix(0.2),
        ),
    ];

    for (label, value_of, color) in series {
        chart
            .draw_series(LineSeries::new(
                summary
                    .days
                    .iter()
                    .map(|day| (naive_date(day.date), value_of(day))),
                color,
            ))
            .unwrap()
            .label(label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .unwrap();

    root.present().unwrap();
    println!("wrote {output}");
}

fn naive_date(date: time::Date) -> chrono::NaiveDate {
    chrono::NaiveDate::from_ymd_opt(date.year(), date.month() as u32, date.day() as u32).unwrap()
}

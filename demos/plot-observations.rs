use plotters::prelude::*;
use weather_report::{ObservationLog, ObservationSummary};

fn main() {
    let input = std::env::args()
        .nth(1)
        .unwrap_or_else(|| String::from("data/historical_6hours.json"));
    println!("opening {input}");

    let summary = ObservationLog::from_path(&input).unwrap().summary().unwrap();
    println!("{summary}");

    let stem = std::path::Path::new(&input)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("observations")
        .to_string();

    draw_boxplot(&summary, &format!("{stem}_temperature.png"));
    draw_frequencies(&summary, &format!("{stem}_weather.png"));
}

fn draw_boxplot(summary: &ObservationSummary, output: &str) {
    let root = BitMapBackend::new(output, (1280, 960)).into_drawing_area();
    root.fill(&WHITE).unwrap();

    let labels = ["Temperature", "Real Feel Temperature"];
    let range = summary.temperature_range();
    let (floor, ceiling) = (range.start as f32 - 1.0, range.end as f32 + 1.0);

    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!(
                "Boxplot comparison of Temperature and Real Feel Temperature, {}",
                summary.dates.first().unwrap()
            ),
            ("sans-serif", 40).into_font(),
        )
        .margin(5)
        .x_label_area_size(80)
        .y_label_area_size(80)
        .build_cartesian_2d(labels[..].into_segmented(), floor..ceiling)
        .unwrap();

    chart.configure_mesh().draw().unwrap();

    chart
        .draw_series([
            Boxplot::new_vertical(
                SegmentValue::CenterOf(&labels[0]),
                &Quartiles::new(&summary.temperatures),
            ),
            Boxplot::new_vertical(
                SegmentValue::CenterOf(&labels[1]),
                &Quartiles::new(&summary.real_feels),
            ),
        ])
        .unwrap();

    root.present().unwrap();
    println!("wrote {output}");
}

fn draw_frequencies(summary: &ObservationSummary, output: &str) {
    let root = BitMapBackend::new(output, (1280, 960)).into_drawing_area();
    root.fill(&WHITE).unwrap();

    let tallest = summary
        .weather_counts
        .iter()
        .map(|(_, count)| *count)
        .max()
        .unwrap() as u32;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            "Frequency comparison of WeatherText",
            ("sans-serif", 40).into_font(),
        )
        .margin(5)
        .x_label_area_size(80)
        .y_label_area_size(80)
        .build_cartesian_2d(
            0i32..summary.weather_counts.len() as i32,
            0u32..tallest + 1,
        )
        .unwrap();

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(summary.weather_counts.len())
        .x_label_formatter(&|index| {
            summary
                .weather_counts
                .get(*index as usize)
                .map(|(label, _)| label.clone())
                .unwrap_or_default()
        })
        .draw()
        .unwrap();

    chart
        .draw_series(
            summary
                .weather_counts
                .iter()
                .enumerate()
                .map(|(index, (_, count))| {
                    Rectangle::new(
                        [(index as i32, 0), (index as i32 + 1, *count as u32)],
                        BLUE.mix(0.6).filled(),
                    )
                }),
        )
        .unwrap();

    root.present().unwrap();
    println!("wrote {output}");
}

/// Colours used for the two live metric charts.
pub const LOSS_COLOR: &str = "#ff005e";
pub const ACCURACY_COLOR: &str = "#00ffe1";

const GRID_COLOR: &str = "#23234a";
const TEXT_COLOR: &str = "#9aa0b5";

/// Renders a `(step, value)` series as an inline SVG line chart.
///
/// Used for the server-side snapshot of a run; the browser redraws the same chart
/// from SSE frames while a run is live.
pub fn line_chart_svg(series: &[(usize, f64)], title: &str, color: &str) -> String {
    if series.len() < 2 {
        return format!("<p class=\"hint\">{title}: not enough data to draw a curve.</p>");
    }

    let w = 760.0f64;
    let h = 220.0f64;
    let pad_l = 48.0f64;
    let pad_r = 16.0f64;
    let pad_t = 24.0f64;
    let pad_b = 24.0f64;

    let max_y = series.iter().map(|&(_, v)| v).fold(0.0f64, f64::max).max(1.0);
    let first_step = series[0].0 as f64;
    let last_step = series[series.len() - 1].0 as f64;
    let span = (last_step - first_step).max(1.0);

    let px = |step: usize, v: f64| -> (f64, f64) {
        let x = pad_l + (step as f64 - first_step) / span * (w - pad_l - pad_r);
        let y = pad_t + (max_y - v) / max_y * (h - pad_t - pad_b);
        (x, y)
    };

    let path: String = series
        .iter()
        .enumerate()
        .map(|(i, &(s, v))| {
            let (x, y) = px(s, v);
            if i == 0 { format!("M{:.1},{:.1}", x, y) } else { format!(" L{:.1},{:.1}", x, y) }
        })
        .collect();

    let y_labels = (0..=4)
        .map(|g| {
            let frac = g as f64 / 4.0;
            let y = pad_t + (1.0 - frac) * (h - pad_t - pad_b);
            format!(
                "<text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"end\" fill=\"{TEXT_COLOR}\" font-size=\"10\">{:.2}</text>\n\
                 <line x1=\"{pad_l:.1}\" y1=\"{y:.1}\" x2=\"{:.1}\" y2=\"{y:.1}\" stroke=\"{GRID_COLOR}\" stroke-width=\"1\"/>",
                pad_l - 4.0,
                y + 4.0,
                max_y * frac,
                w - pad_r,
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let x_labels = [series[0].0, series[series.len() / 2].0, series[series.len() - 1].0]
        .iter()
        .map(|&s| {
            let (x, _) = px(s, 0.0);
            format!(
                "<text x=\"{x:.1}\" y=\"{:.1}\" text-anchor=\"middle\" fill=\"{TEXT_COLOR}\" font-size=\"10\">{s}</text>",
                h - 4.0
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "<svg class=\"metric-svg\" width=\"{w}\" height=\"{h}\" xmlns=\"http://www.w3.org/2000/svg\">\n\
         <text x=\"{pad_l}\" y=\"14\" fill=\"{color}\" font-size=\"12\">{title}</text>\n\
         {y_labels}\n{x_labels}\n\
         <path d=\"{path}\" stroke=\"{color}\" stroke-width=\"2\" fill=\"none\"/>\n\
         </svg>"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_series_gives_hint() {
        assert!(line_chart_svg(&[(0, 0.5)], "Loss", LOSS_COLOR).contains("not enough data"));
    }

    #[test]
    fn test_path_has_one_segment_per_point() {
        let series: Vec<(usize, f64)> = (0..10).map(|i| (i, 1.0 - i as f64 / 10.0)).collect();
        let svg = line_chart_svg(&series, "Loss", LOSS_COLOR);
        assert!(svg.starts_with("<svg"));
        assert_eq!(svg.matches(" L").count(), 9);
        assert!(svg.contains(LOSS_COLOR));
    }
}

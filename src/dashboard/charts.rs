//! Chart generation and rendering for the dashboard.
//!
//! Charts are drawn with ECharts. Each [ChartData] is turned into an ECharts
//! configuration with charming, and the page gets an HTML container plus a
//! short script per chart that initialises it.

use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title},
    element::{
        AxisLabel, AxisPointer, AxisPointerType, AxisType, Color, JsFunction, Tooltip, Trigger,
    },
    series::{Line, Pie},
};
use maud::{Markup, PreEscaped, html};

use crate::{dashboard::chart_data::ChartData, html::HeadElement};

/// Shown in place of a chart that has nothing to draw.
pub(super) const NO_DATA_MESSAGE: &str = "No data available.";

/// What to show for a dashboard chart.
#[derive(Debug, Clone, PartialEq)]
pub(super) enum ChartBody {
    /// The ECharts configuration as a JSON string, safe to inline in a
    /// `<script>` element.
    Options(String),
    /// The chart has no data, show this message instead.
    NoData(&'static str),
    /// The data for the chart could not be fetched, show this message instead.
    Failed(String),
}

/// A dashboard chart with its HTML container ID.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct DashboardChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The heading shown above an empty or failed chart.
    pub title: &'static str,
    pub body: ChartBody,
}

impl DashboardChart {
    /// A doughnut chart, or the no-data message if `data` is empty.
    pub fn doughnut(id: &'static str, title: &'static str, data: &ChartData) -> Self {
        let body = if data.is_empty() {
            ChartBody::NoData(NO_DATA_MESSAGE)
        } else {
            ChartBody::Options(script_safe_options(&doughnut_chart(title, data)))
        };

        Self { id, title, body }
    }

    /// A line chart, or the no-data message if `data` has no points.
    ///
    /// Unlike doughnut charts, a line of zeros is still drawn.
    pub fn line(id: &'static str, title: &'static str, data: &ChartData) -> Self {
        let body = if data.labels.is_empty() {
            ChartBody::NoData(NO_DATA_MESSAGE)
        } else {
            ChartBody::Options(script_safe_options(&balance_line_chart(title, data)))
        };

        Self { id, title, body }
    }

    /// Replaces the default no-data message.
    pub fn with_empty_message(mut self, message: &'static str) -> Self {
        if let ChartBody::NoData(_) = self.body {
            self.body = ChartBody::NoData(message);
        }

        self
    }

    /// A chart whose data could not be loaded.
    pub fn failed(id: &'static str, title: &'static str, message: String) -> Self {
        Self {
            id,
            title,
            body: ChartBody::Failed(message),
        }
    }
}

/// Serialises `chart` for a `<script>` element.
///
/// Labels come from user data, so `<` is escaped to stop a label such as
/// `</script>` from closing the element.
fn script_safe_options(chart: &Chart) -> String {
    chart.to_string().replace('<', "\\u003c")
}

/// Renders the HTML containers for dashboard charts.
///
/// Charts without options get their message rendered in place of the chart.
pub(super) fn charts_view(charts: &[DashboardChart]) -> Markup {
    html!(
        section
            id="charts"
            class="w-full mx-auto mb-4"
        {
            div class="grid grid-cols-1 xl:grid-cols-2 gap-4"
            {
                @for chart in charts {
                    @match &chart.body {
                        ChartBody::Options(_) => {
                            div
                                id=(chart.id)
                                class="min-h-[380px] rounded dark:bg-gray-100"
                            {}
                        }
                        ChartBody::NoData(message) => {
                            (chart_message(chart, message, "text-gray-500 dark:text-gray-400"))
                        }
                        ChartBody::Failed(message) => {
                            (chart_message(chart, message, "text-red-600 dark:text-red-400"))
                        }
                    }
                }
            }
        }
    )
}

fn chart_message(chart: &DashboardChart, message: &str, text_class: &str) -> Markup {
    html!(
        div
            id=(chart.id)
            class="min-h-[380px] rounded p-4 flex flex-col bg-gray-50 dark:bg-gray-800"
        {
            h3 class="text-lg font-semibold" { (chart.title) }

            p class={"m-auto " (text_class)} { (message) }
        }
    )
}

/// JavaScript that initialises every chart that has options.
///
/// Creates scripts that initialize ECharts instances with dark mode support
/// and responsive resizing.
pub(super) fn charts_init_script(charts: &[DashboardChart]) -> String {
    charts
        .iter()
        .filter_map(|chart| match &chart.body {
            ChartBody::Options(options) => Some(format!(
                r#"(function() {{
                    const chartDom = document.getElementById("{}");
                    const chart = echarts.init(chartDom);
                    const option = {};
                    chart.setOption(option);

                    window.addEventListener('resize', chart.resize);

                    const darkModeMediaQuery = window.matchMedia('(prefers-color-scheme: dark)');
                    const updateTheme = () => {{
                        const isDarkMode = darkModeMediaQuery.matches;
                        chart.setTheme(isDarkMode ? 'dark' : 'default');
                    }}
                    darkModeMediaQuery.addEventListener('change', updateTheme);
                    updateTheme();
                }})();"#,
                chart.id, options
            )),
            ChartBody::NoData(_) | ChartBody::Failed(_) => None,
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// The chart initialisation script for the head of a full page.
///
/// The script waits for the DOM to load so the chart containers exist.
pub(super) fn charts_script(charts: &[DashboardChart]) -> HeadElement {
    let wrapped_script = format!(
        "document.addEventListener('DOMContentLoaded', function() {{\n{}\n}});",
        charts_init_script(charts)
    );

    HeadElement::ScriptSource(PreEscaped(wrapped_script))
}

/// A doughnut chart with one segment per label of the first dataset.
pub(super) fn doughnut_chart(title: &str, data: &ChartData) -> Chart {
    let Some(dataset) = data.datasets.first() else {
        return Chart::new().title(Title::new().text(title));
    };

    let segments: Vec<(f64, &str)> = dataset
        .data
        .iter()
        .copied()
        .zip(data.labels.iter().map(String::as_str))
        .collect();
    let colours: Vec<Color> = dataset
        .background_color
        .iter()
        .map(|colour| Color::from(colour.as_str()))
        .collect();

    Chart::new()
        .title(Title::new().text(title).left(20).top("1%"))
        .color(colours)
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Item)
                .value_formatter(currency_formatter()),
        )
        .legend(Legend::new().bottom(0))
        .series(
            Pie::new()
                .name(dataset.label.as_deref().unwrap_or(title))
                .radius(vec!["40%", "70%"])
                .data(segments),
        )
}

/// A line chart of the first dataset, with a currency axis.
pub(super) fn balance_line_chart(title: &str, data: &ChartData) -> Chart {
    let values = data
        .datasets
        .first()
        .map(|dataset| dataset.data.clone())
        .unwrap_or_default();
    let name = data
        .datasets
        .first()
        .and_then(|dataset| dataset.label.clone())
        .unwrap_or_else(|| title.to_owned());

    Chart::new()
        .title(Title::new().text(title).left(20).top("1%"))
        .tooltip(currency_tooltip())
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(
            Axis::new()
                .type_(AxisType::Category)
                .data(data.labels.clone()),
        )
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
        .series(Line::new().name(name).data(values))
}

#[inline]
fn currency_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const currencyFormatter = new Intl.NumberFormat('en-US', {
              style: 'currency',
              currency: 'USD'
            });
            return (number) ? currencyFormatter.format(number) : \"-\";",
    )
}

/// Creates a tooltip configuration for currency values
fn currency_tooltip() -> Tooltip {
    Tooltip::new()
        .trigger(Trigger::Axis)
        .value_formatter(currency_formatter())
        .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow))
}

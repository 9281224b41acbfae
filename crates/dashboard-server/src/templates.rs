//! Hand-rendered HTML for the two pages the dashboard serves.

use dashboard_orchestrator::DashboardReport;

pub fn escape_html(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '&' => "&amp;".to_string(),
            '<' => "&lt;".to_string(),
            '>' => "&gt;".to_string(),
            '"' => "&quot;".to_string(),
            '\'' => "&#39;".to_string(),
            c => c.to_string(),
        })
        .collect()
}

fn inline_img(base64_png: &str) -> String {
    format!("<img src=\"data:image/png;base64,{}\"><br>\n", base64_png)
}

pub fn render_index(stock_list: &[&str], checked: &[&str]) -> String {
    let mut checkboxes = String::new();
    for stock in stock_list {
        let checked_attr = if checked.contains(stock) { " checked" } else { "" };
        checkboxes.push_str(&format!(
            "    <input type=\"checkbox\" name=\"compare_stocks\" value=\"{stock}\"{checked_attr}> {stock}<br>\n"
        ));
    }

    format!(
        "<!DOCTYPE html>\n\
<html>\n\
<head><title>Stock Dashboard</title></head>\n\
<body>\n\
<h2>Stock Market Dashboard</h2>\n\
<form method=\"POST\" action=\"/result\">\n\
    <label>Stock Symbol:</label>\n\
    <input type=\"text\" name=\"ticker\" value=\"AAPL\" required><br><br>\n\
\n\
    <label>Moving Average Period:</label>\n\
    <input type=\"number\" name=\"ma_period\" value=\"20\"><br><br>\n\
\n\
    <label>Bollinger Band Period:</label>\n\
    <input type=\"number\" name=\"bb_period\" value=\"20\"><br><br>\n\
\n\
    <label>Compare Stocks:</label><br>\n\
{checkboxes}\
    <br><input type=\"submit\" value=\"Analyze\">\n\
</form>\n\
</body></html>\n"
    )
}

pub fn render_inline_error(message: &str) -> String {
    format!("<h3>{}</h3>\n", escape_html(message))
}

pub fn render_result(report: &DashboardReport) -> String {
    let ticker = escape_html(&report.ticker);
    let mut body = String::new();

    body.push_str(&format!(
        "<!DOCTYPE html>\n<html><head><title>{ticker} Results</title></head>\n<body>\n<h2>Results for {ticker}</h2>\n\n"
    ));

    body.push_str("<h3>Moving Average</h3>\n");
    body.push_str(&inline_img(&report.ma_chart.base64_png));

    body.push_str("\n<h3>Bollinger Bands</h3>\n");
    body.push_str(&inline_img(&report.bollinger_chart.base64_png));

    body.push_str("\n<h3>ARIMA Forecast</h3>\n");
    match report.forecast_chart.ready() {
        Some(chart) => body.push_str(&inline_img(&chart.base64_png)),
        None => body.push_str("<p>Forecasting Failed.</p>\n"),
    }

    if let Some(headlines) = report.sentiment.ready() {
        if !headlines.is_empty() {
            body.push_str("\n<h3>News Sentiment</h3>\n<table border=\"1\">\n");
            body.push_str("<tr><th>Headline</th><th>Sentiment</th><th>Score</th></tr>\n");
            for headline in headlines {
                body.push_str(&format!(
                    "<tr><td>{}</td><td>{}</td><td>{:.2}</td></tr>\n",
                    escape_html(&headline.title),
                    headline.label.as_str(),
                    headline.score,
                ));
            }
            body.push_str("</table>\n");
        }
    }

    if let Some(chart) = &report.correlation_chart {
        body.push_str("\n<h3>Market Correlation</h3>\n");
        body.push_str(&inline_img(&chart.base64_png));
    }

    body.push_str("\n<br><a href=\"/\">Go Back</a>\n</body></html>\n");
    body
}

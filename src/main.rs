mod artifact;
mod cache_key;
mod config;
mod errors;
mod features;
mod handlers;
mod models;
mod recommendation;
mod scoring;

use axum::{
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorLayer,
};
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::scoring::ScoringModel;

/// Serves the OpenAPI specification YAML file.
///
/// Reads `openapi.yml` from the filesystem and serves it with the
/// appropriate content type. Returns a 404 if the file is not found.
async fn serve_openapi_spec() -> impl IntoResponse {
    match tokio::fs::read_to_string("openapi.yml").await {
        Ok(content) => (
            StatusCode::OK,
            [(axum::http::header::CONTENT_TYPE, "text/yaml")],
            content,
        )
            .into_response(),
        Err(_) => (StatusCode::NOT_FOUND, "OpenAPI spec not found.").into_response(),
    }
}

/// Serves the Swagger UI HTML page, configured to load the OpenAPI
/// specification served by `serve_openapi_spec`.
async fn serve_swagger_ui() -> impl IntoResponse {
    let html = r#"
<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Deposit Scoring API - Swagger UI</title>
    <link rel="stylesheet" type="text/css" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css">
    <style>
        body { margin: 0; padding: 0; }
    </style>
</head>
<body>
    <div id="swagger-ui"></div>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-standalone-preset.js"></script>
    <script>
        window.onload = function() {
            window.ui = SwaggerUIBundle({
                url: "/api-docs/openapi.yml",
                dom_id: '#swagger-ui',
                deepLinking: true,
                presets: [
                    SwaggerUIBundle.presets.apis,
                    SwaggerUIStandalonePreset
                ],
                layout: "StandaloneLayout"
            });
        };
    </script>
</body>
</html>
"#;
    (
        StatusCode::OK,
        [(axum::http::header::CONTENT_TYPE, "text/html; charset=utf-8")],
        html,
    )
}

/// Serves the single-page prediction form.
///
/// Every field is a bounded widget matching the model's input ranges; the
/// predict button posts the collected profile to `/api/v1/predict` and the
/// result panel renders verdict, probability, a proportional bar, and the
/// tier recommendation. The page checks `/api/v1/model` on load and disables
/// the predict control when no artifact is available.
async fn serve_form_page() -> impl IntoResponse {
    let html = r##"
<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>Bank Term Deposit Subscription Predictor</title>
<style>
    body { font-family: system-ui, sans-serif; margin: 0; background: #f5f6f8; color: #222; }
    .wrap { max-width: 960px; margin: 0 auto; padding: 2rem; }
    h1 { margin-top: 0; }
    fieldset { border: 1px solid #d6d9de; border-radius: 8px; margin-bottom: 1rem; background: #fff; }
    legend { font-weight: 600; padding: 0 0.4rem; }
    .grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(220px, 1fr)); gap: 0.8rem; padding: 0.4rem; }
    label { display: block; font-size: 0.85rem; margin-bottom: 0.2rem; }
    select, input { width: 100%; box-sizing: border-box; padding: 0.35rem; border: 1px solid #c4c8ce; border-radius: 6px; }
    button { width: 100%; background-color: #2ecc71; color: white; font-weight: bold; padding: 0.6rem; border: none; border-radius: 10px; font-size: 1rem; cursor: pointer; }
    button:hover { background-color: #27ae60; }
    button:disabled { background-color: #9aa1a9; cursor: not-allowed; }
    #banner { display: none; background: #fdecea; border: 1px solid #e5b4ae; border-radius: 8px; padding: 0.8rem; margin-bottom: 1rem; }
    #error { display: none; background: #fdecea; border: 1px solid #e5b4ae; border-radius: 8px; padding: 0.8rem; margin-top: 1rem; }
    #result { display: none; background: #fff; border: 1px solid #d6d9de; border-radius: 8px; padding: 1rem; margin-top: 1rem; }
    #verdict.positive { color: #1e8e3e; }
    #verdict.negative { color: #c5221f; }
    .bar { background: #e4e7eb; border-radius: 6px; height: 14px; overflow: hidden; margin: 0.5rem 0 1rem; }
    .bar > div { background: #2ecc71; height: 100%; width: 0; transition: width 0.3s; }
    .tier { border-left: 4px solid #888; padding: 0.6rem 0.8rem; background: #f2f4f6; border-radius: 0 6px 6px 0; }
    .tier.HIGH { border-color: #1e8e3e; }
    .tier.MEDIUM { border-color: #f0a500; }
    .tier.LOW { border-color: #5b78c7; }
    .footer { color: #888; text-align: center; font-size: 0.8rem; margin-top: 2rem; }
</style>
</head>
<body>
<div class="wrap">
    <h1>Bank Term Deposit Subscription Predictor</h1>
    <div id="banner"></div>

    <fieldset>
        <legend>Personal Details</legend>
        <div class="grid">
            <div><label for="age">Age: <span id="age-value">35</span></label>
                <input type="range" id="age" min="18" max="95" value="35"></div>
            <div><label for="job">Job</label>
                <select id="job">
                    <option value="admin.">admin.</option>
                    <option value="blue-collar">blue-collar</option>
                    <option value="entrepreneur">entrepreneur</option>
                    <option value="housemaid">housemaid</option>
                    <option value="management">management</option>
                    <option value="retired">retired</option>
                    <option value="self-employed">self-employed</option>
                    <option value="services">services</option>
                    <option value="student">student</option>
                    <option value="technician">technician</option>
                    <option value="unemployed">unemployed</option>
                    <option value="unknown">unknown</option>
                </select></div>
            <div><label for="marital">Marital Status</label>
                <select id="marital">
                    <option>married</option><option>single</option>
                    <option>divorced</option><option>unknown</option>
                </select></div>
            <div><label for="education">Education</label>
                <select id="education">
                    <option value="basic.4y">basic.4y</option>
                    <option value="basic.6y">basic.6y</option>
                    <option value="basic.9y">basic.9y</option>
                    <option value="high.school">high.school</option>
                    <option value="illiterate">illiterate</option>
                    <option value="professional.course">professional.course</option>
                    <option value="university.degree">university.degree</option>
                    <option value="unknown">unknown</option>
                </select></div>
        </div>
    </fieldset>

    <fieldset>
        <legend>Financial Status</legend>
        <div class="grid">
            <div><label for="default">Credit in Default?</label>
                <select id="default"><option>no</option><option>yes</option><option>unknown</option></select></div>
            <div><label for="housing">Housing Loan?</label>
                <select id="housing"><option>no</option><option>yes</option><option>unknown</option></select></div>
            <div><label for="loan">Personal Loan?</label>
                <select id="loan"><option>no</option><option>yes</option><option>unknown</option></select></div>
        </div>
    </fieldset>

    <fieldset>
        <legend>Campaign Details</legend>
        <div class="grid">
            <div><label for="contact">Contact Type</label>
                <select id="contact"><option>cellular</option><option>telephone</option></select></div>
            <div><label for="month">Last Contact Month</label>
                <select id="month">
                    <option>jan</option><option>feb</option><option>mar</option><option>apr</option>
                    <option>may</option><option>jun</option><option>jul</option><option>aug</option>
                    <option>sep</option><option>oct</option><option>nov</option><option>dec</option>
                </select></div>
            <div><label for="day_of_week">Last Contact Day</label>
                <select id="day_of_week">
                    <option>mon</option><option>tue</option><option>wed</option>
                    <option>thu</option><option>fri</option>
                </select></div>
            <div><label for="campaign">Contacts in Current Campaign</label>
                <input type="number" id="campaign" min="1" max="50" value="2"></div>
            <div><label for="pdays">Days Since Last Contact (999 if never)</label>
                <input type="number" id="pdays" min="0" max="999" value="999"></div>
            <div><label for="previous">Previous Contacts</label>
                <input type="number" id="previous" min="0" max="10" value="0"></div>
            <div><label for="poutcome">Previous Campaign Outcome</label>
                <select id="poutcome"><option>nonexistent</option><option>failure</option><option>success</option></select></div>
        </div>
    </fieldset>

    <fieldset>
        <legend>Economic Indicators</legend>
        <div class="grid">
            <div><label for="emp_var_rate">Employment Variation Rate</label>
                <input type="number" id="emp_var_rate" min="-5" max="5" step="0.1" value="1.1"></div>
            <div><label for="cons_price_idx">Consumer Price Index</label>
                <input type="number" id="cons_price_idx" min="90" max="100" step="0.001" value="93.994"></div>
            <div><label for="cons_conf_idx">Consumer Confidence Index</label>
                <input type="number" id="cons_conf_idx" min="-60" max="0" step="0.1" value="-36.4"></div>
            <div><label for="euribor3m">Euribor 3 Month Rate</label>
                <input type="number" id="euribor3m" min="0" max="10" step="0.001" value="4.857"></div>
            <div><label for="nr_employed">Number of Employees</label>
                <input type="number" id="nr_employed" min="4900" max="5300" step="0.1" value="5191.0"></div>
        </div>
    </fieldset>

    <button id="predict">Predict Subscription</button>
    <div id="error"></div>

    <div id="result">
        <h2 id="verdict"></h2>
        <div>Subscription Probability: <strong id="probability"></strong></div>
        <div class="bar"><div id="probability-bar"></div></div>
        <div class="tier" id="tier-box">
            <strong id="tier-headline"></strong>
            <ul id="tier-lines"></ul>
        </div>
        <div>Model version: <span id="model-version"></span></div>
    </div>

    <div class="footer">Bank Marketing Prediction System</div>
</div>

<script>
    var el = function (id) { return document.getElementById(id); };

    el('age').addEventListener('input', function () {
        el('age-value').textContent = el('age').value;
    });

    // No artifact loaded: disable the predict control.
    fetch('/api/v1/model').then(function (res) {
        if (!res.ok) {
            return res.json().then(function (body) {
                el('predict').disabled = true;
                var banner = el('banner');
                banner.style.display = 'block';
                banner.textContent = body.error + (body.hint ? ' ' + body.hint : '');
            });
        }
    }).catch(function () { /* leave the control enabled; the POST will report */ });

    function clamp(value, min, max) {
        return Math.min(max, Math.max(min, value));
    }

    function collectProfile() {
        return {
            age: clamp(parseInt(el('age').value, 10), 18, 95),
            job: el('job').value,
            marital: el('marital').value,
            education: el('education').value,
            default: el('default').value,
            housing: el('housing').value,
            loan: el('loan').value,
            contact: el('contact').value,
            month: el('month').value,
            day_of_week: el('day_of_week').value,
            campaign: clamp(parseInt(el('campaign').value, 10) || 1, 1, 50),
            pdays: clamp(parseInt(el('pdays').value, 10) || 999, 0, 999),
            previous: clamp(parseInt(el('previous').value, 10) || 0, 0, 10),
            poutcome: el('poutcome').value,
            emp_var_rate: clamp(parseFloat(el('emp_var_rate').value) || 0, -5, 5),
            cons_price_idx: clamp(parseFloat(el('cons_price_idx').value) || 90, 90, 100),
            cons_conf_idx: clamp(parseFloat(el('cons_conf_idx').value) || -60, -60, 0),
            euribor3m: clamp(parseFloat(el('euribor3m').value) || 0, 0, 10),
            nr_employed: clamp(parseFloat(el('nr_employed').value) || 4900, 4900, 5300)
        };
    }

    el('predict').addEventListener('click', function () {
        el('error').style.display = 'none';

        fetch('/api/v1/predict', {
            method: 'POST',
            headers: { 'Content-Type': 'application/json' },
            body: JSON.stringify(collectProfile())
        }).then(function (res) {
            return res.json().then(function (body) { return { ok: res.ok, body: body }; });
        }).then(function (outcome) {
            if (!outcome.ok) {
                // Prior displayed results stay intact on failure.
                var err = el('error');
                err.style.display = 'block';
                err.textContent = outcome.body.error + (outcome.body.hint ? ' ' + outcome.body.hint : '');
                return;
            }
            var body = outcome.body;
            var verdict = el('verdict');
            verdict.textContent = body.verdict;
            verdict.className = body.label === 1 ? 'positive' : 'negative';
            el('probability').textContent = (body.probability * 100).toFixed(1) + '%';
            el('probability-bar').style.width = (body.probability * 100).toFixed(1) + '%';
            el('tier-box').className = 'tier ' + body.tier;
            el('tier-headline').textContent = body.tier + ' PRIORITY CLIENT';
            var lines = el('tier-lines');
            lines.innerHTML = '';
            body.recommendation.forEach(function (line) {
                var li = document.createElement('li');
                li.textContent = line;
                lines.appendChild(li);
            });
            el('model-version').textContent = body.model_version;
            el('result').style.display = 'block';
        }).catch(function (e) {
            var err = el('error');
            err.style.display = 'block';
            err.textContent = 'Request failed: ' + e;
        });
    });
</script>
</body>
</html>
"##;
    (
        StatusCode::OK,
        [(axum::http::header::CONTENT_TYPE, "text/html; charset=utf-8")],
        html,
    )
}

/// Main entry point for the application.
///
/// Initializes logging, configuration, the scoring model (loaded exactly
/// once; the service stays up with scoring disabled if the artifact is
/// absent or broken), the score cache, and the HTTP routes and middleware.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "deposit_scoring_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;

    // Load the scoring artifact exactly once. The handle lives in AppState
    // for the process lifetime; there is no reload path.
    let model = match artifact::load(&config.model_path) {
        Ok(loaded) => Some(Arc::new(ScoringModel::new(loaded))),
        Err(e) => {
            tracing::error!("{}", e);
            tracing::warn!(
                "Scoring is disabled. Train and export the artifact to {} and restart.",
                config.model_path
            );
            None
        }
    };

    // Score cache: identical form submissions within the TTL are served
    // without re-running the pipeline.
    let score_cache = Cache::builder()
        .time_to_live(Duration::from_secs(config.score_cache_ttl_secs))
        .max_capacity(config.score_cache_capacity)
        .build();
    tracing::info!("Score cache initialized");

    // Build application state
    let app_state = Arc::new(handlers::AppState {
        config: config.clone(),
        model,
        score_cache,
    });

    // Configure rate limiter: 10 requests/second per IP, burst of 20
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(10)
            .burst_size(20)
            .key_extractor(SmartIpKeyExtractor)
            .finish()
            .unwrap(),
    );

    // Build protected routes with security layers
    let protected_routes = Router::new()
        // API Documentation
        .route("/docs", get(serve_swagger_ui))
        .route("/api-docs/openapi.yml", get(serve_openapi_spec))
        // API endpoints
        .route("/api/v1/predict", post(handlers::predict))
        .route("/api/v1/model", get(handlers::model_info))
        .layer(
            ServiceBuilder::new()
                // Request size limit: a profile is a few hundred bytes
                .layer(RequestBodyLimitLayer::new(1024 * 1024))
                .layer(GovernorLayer {
                    config: governor_conf,
                }),
        );

    // Build final app with health check and form page outside rate limiting
    let app = Router::new()
        .route("/health", get(handlers::health))
        .route("/", get(serve_form_page))
        .merge(protected_routes)
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

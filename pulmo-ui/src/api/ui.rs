//! UI Routes - HTML page for the pulmo-ui web interface
//!
//! Single dashboard page, vanilla HTML/CSS/JS (no frameworks).

use axum::{
    response::{Html, IntoResponse},
    routing::get,
    Router,
};

use crate::AppState;

/// Build UI routes
pub fn ui_routes() -> Router<AppState> {
    Router::new().route("/", get(root_page))
}

/// Root page - triage dashboard
async fn root_page() -> impl IntoResponse {
    Html(
        r#"
<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>PulmoTriage - Risk Assessment</title>
    <style>
        body {
            font-family: system-ui, -apple-system, sans-serif;
            max-width: 900px;
            margin: 40px auto;
            padding: 20px;
            line-height: 1.6;
            color: #222;
        }
        h1 {
            border-bottom: 2px solid #0066cc;
            padding-bottom: 10px;
        }
        .panel {
            border: 1px solid #ddd;
            border-radius: 8px;
            padding: 16px 20px;
            margin: 16px 0;
        }
        .panel h2 {
            margin-top: 0;
            font-size: 1.1em;
        }
        .button {
            display: inline-block;
            padding: 8px 16px;
            background: #0066cc;
            color: white;
            border: none;
            border-radius: 4px;
            cursor: pointer;
            margin-right: 8px;
        }
        .button.secondary { background: #555; }
        label { display: inline-block; width: 190px; }
        input[type="number"] { width: 90px; }
        .row { margin: 4px 0; }
        #triage-level { font-size: 1.6em; font-weight: bold; }
        .disclaimer {
            background: #fff8e1;
            border: 1px solid #e0c060;
            border-radius: 8px;
            padding: 10px 16px;
            font-size: 0.85em;
            font-style: italic;
        }
        pre { white-space: pre-wrap; }
    </style>
</head>
<body>
    <h1>PulmoTriage Risk Assessment</h1>

    <div class="panel">
        <h2>Vital Signs</h2>
        <div class="row"><label>Temperature (&deg;C)</label><input type="number" id="temp" step="0.1" value="37.0"></div>
        <div class="row"><label>SpO2 (%)</label><input type="number" id="spo2" step="1" value="98"></div>
        <div class="row"><label>Heart rate (bpm)</label><input type="number" id="hr" step="1" value="100"></div>
        <div class="row"><label>Resp rate (breaths/min)</label><input type="number" id="rr" step="1" value="25"></div>
        <div class="row"><label>Cough</label><input type="checkbox" id="cough"></div>
        <div class="row"><label>Chest retractions</label><input type="checkbox" id="retractions"></div>
        <p>
            <button class="button" onclick="applyVitals()">Apply</button>
            <button class="button secondary" onclick="simulate('normal')">Simulate normal</button>
            <button class="button secondary" onclick="simulate('pneumonia')">Simulate pneumonia</button>
        </p>
        <p id="pattern"></p>
    </div>

    <div class="panel">
        <h2>Chest X-ray</h2>
        <input type="file" id="xray-file" accept="image/*">
        <button class="button" onclick="analyzeXray()">Analyze</button>
        <p id="xray-result"></p>
    </div>

    <div class="panel">
        <h2>Assessment</h2>
        <button class="button" onclick="refreshAssessment()">Evaluate</button>
        <p id="triage-level"></p>
        <p id="recommendation"></p>
        <p id="gate"></p>
        <p id="trust"></p>
        <p id="triangulation"></p>
        <ul id="risk-factors"></ul>
    </div>

    <div class="panel">
        <h2>Clinical Report</h2>
        <button class="button" onclick="generateReport()">Generate report</button>
        <pre id="report"></pre>
    </div>

    <div class="disclaimer">
        CLINICAL DISCLAIMER: This simulation is for educational purposes only.
        Diagnosis must be made by a qualified healthcare professional.
    </div>

    <script>
        function readVitals() {
            return {
                Temperature_C: parseFloat(document.getElementById('temp').value),
                Temperature_trend: 0,
                SpO2_percent: parseFloat(document.getElementById('spo2').value),
                SpO2_trend: 0,
                HeartRate_bpm: parseFloat(document.getElementById('hr').value),
                HeartRate_trend: 0,
                RespRate_bpm: parseFloat(document.getElementById('rr').value),
                RespRate_trend: 0,
                Cough: document.getElementById('cough').checked ? 1 : 0,
                Retractions: document.getElementById('retractions').checked ? 1 : 0,
            };
        }

        function showVitals(v) {
            document.getElementById('temp').value = v.Temperature_C;
            document.getElementById('spo2').value = v.SpO2_percent;
            document.getElementById('hr').value = v.HeartRate_bpm;
            document.getElementById('rr').value = v.RespRate_bpm;
            document.getElementById('cough').checked = v.Cough === 1;
            document.getElementById('retractions').checked = v.Retractions === 1;
        }

        async function applyVitals() {
            await fetch('/api/vitals', {
                method: 'PUT',
                headers: { 'Content-Type': 'application/json' },
                body: JSON.stringify({ vitals: readVitals() }),
            });
            refreshAssessment();
        }

        async function simulate(scenario) {
            const response = await fetch('/api/vitals/simulate', {
                method: 'POST',
                headers: { 'Content-Type': 'application/json' },
                body: JSON.stringify({ scenario: scenario }),
            });
            const data = await response.json();
            showVitals(data.vitals);
            document.getElementById('pattern').textContent = data.pattern_message;
            refreshAssessment();
        }

        async function analyzeXray() {
            const input = document.getElementById('xray-file');
            if (!input.files.length) return;
            const form = new FormData();
            form.append('image', input.files[0]);
            const response = await fetch('/api/analyze-xray', { method: 'POST', body: form });
            if (!response.ok) {
                const err = await response.json();
                document.getElementById('xray-result').textContent =
                    'Analysis failed: ' + err.error.message;
                return;
            }
            const data = await response.json();
            document.getElementById('xray-result').textContent =
                data.label + ' (probability ' + data.probability.toFixed(2) +
                ', confidence ' + data.confidence.toFixed(2) + ')';
            refreshAssessment();
        }

        async function refreshAssessment() {
            const response = await fetch('/api/assessment');
            const data = await response.json();
            document.getElementById('triage-level').textContent = data.triage_level;
            document.getElementById('recommendation').textContent = data.recommendation;
            document.getElementById('gate').textContent =
                'Gate: ' + data.fusion.gate_rationale +
                ' (imaging ' + (data.fusion.imaging_weight * 100).toFixed(0) + '% / vitals ' +
                (data.fusion.vitals_weight * 100).toFixed(0) + '%, score ' +
                data.fusion.final_score.toFixed(2) + ')';
            document.getElementById('trust').textContent =
                'Trust: ' + data.trust_score.toFixed(2) + ' (' + data.trust_interpretation + ')';
            document.getElementById('triangulation').textContent = data.triangulation;
            const list = document.getElementById('risk-factors');
            list.innerHTML = '';
            data.risk_factors.forEach(function (factor) {
                const item = document.createElement('li');
                item.textContent = factor;
                list.appendChild(item);
            });
        }

        async function generateReport() {
            const analysisResponse = await fetch('/api/analyze-vitals', {
                method: 'POST',
                headers: { 'Content-Type': 'application/json' },
                body: JSON.stringify({}),
            });
            if (!analysisResponse.ok) {
                const err = await analysisResponse.json();
                document.getElementById('report').textContent =
                    'Vitals analysis failed: ' + err.error.message;
                return;
            }
            const analysis = await analysisResponse.json();

            const xray = await (await fetch('/api/xray')).json();
            const reportResponse = await fetch('/api/generate-report', {
                method: 'POST',
                headers: { 'Content-Type': 'application/json' },
                body: JSON.stringify({
                    vitals_probability: analysis.vitals_probability,
                    age_group: 'Preschool',
                    image_probability: xray.imaging ? xray.imaging.probability : 0,
                    shap_contributors: analysis.top_contributors,
                    age_adjusted_flags: analysis.age_adjusted_flags,
                    risk_factors_text: analysis.risk_factors_text,
                }),
            });
            const report = await reportResponse.json();
            document.getElementById('report').textContent =
                report.triage_level + '\n\n' +
                report.clinical_report + '\n\nNext steps:\n- ' +
                report.next_steps.join('\n- ');
        }

        // Live updates
        const events = new EventSource('/events');
        events.addEventListener('AssessmentCompleted', refreshAssessment);

        refreshAssessment();
    </script>
</body>
</html>
"#,
    )
}

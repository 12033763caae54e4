//! Built-in email fragment templates.
//!
//! Every source must stay well-formed XHTML: void elements self-closed,
//! numeric character references only. The inliner parses the assembled
//! document strictly and leaves anything malformed class-styled.
//!
//! Contexts reaching these templates are fully escaped, and numbers arrive
//! pre-formatted, so templates print values directly.

pub const PRACTICE_REPORT: &str = r#"<table role="presentation" class="header-banner" width="100%" cellpadding="0" cellspacing="0" border="0">
<tr><td class="header-cell">
<p class="header-eyebrow">Practice Performance Report</p>
<h1 class="header-title">{{ location }}</h1>
{% if period %}
<p class="header-subtitle">{{ period }}</p>
{% endif %}
</td></tr>
</table>
<div class="section">
<h2 class="section-title">Financial Performance</h2>
<table role="presentation" class="metric-grid" width="100%" cellpadding="0" cellspacing="0" border="0">
{% for row in metric_rows %}
<tr>
{% for metric in row %}
<td class="metric-cell" width="50%" valign="top">
<div class="metric-card metric-{{ metric.status }}">
<p class="metric-label">{{ metric.label }}</p>
<p class="metric-value">{{ metric.value }}</p>
<p class="metric-subtitle">{{ metric.attainment }} of {{ metric.goal }} goal</p>
<div class="progress-track"><div class="progress-bar progress-{{ metric.status }}" style="width: {{ metric.bar_width }}%;">&#160;</div></div>
</div>
</td>
{% endfor %}
</tr>
{% endfor %}
</table>
</div>
<div class="section">
<h2 class="section-title">Provider Performance</h2>
{% if providers %}
<table role="presentation" class="data-table" width="100%" cellpadding="0" cellspacing="0" border="0">
<tr>
<th class="table-header" align="left">Provider</th>
<th class="table-header table-cell-num">Production</th>
<th class="table-header table-cell-num">Goal</th>
<th class="table-header table-cell-num">Attainment</th>
</tr>
{% for provider in providers %}
<tr>
<td class="table-cell{% if provider.alt %} table-cell-alt{% endif %}"><span class="provider-name">{{ provider.name }}</span>{% if provider.role %}<br /><span class="provider-role">{{ provider.role }}</span>{% endif %}</td>
<td class="table-cell table-cell-num{% if provider.alt %} table-cell-alt{% endif %}">{{ provider.production or "&#8212;" }}</td>
<td class="table-cell table-cell-num{% if provider.alt %} table-cell-alt{% endif %}">{{ provider.goal or "&#8212;" }}</td>
<td class="table-cell table-cell-num{% if provider.alt %} table-cell-alt{% endif %}">{% if provider.status %}<span class="status-pill status-{{ provider.status }}">{{ provider.attainment }}</span>{% else %}&#8212;{% endif %}</td>
</tr>
{% endfor %}
</table>
{% else %}
<p class="empty-state">No provider data for this period.</p>
{% endif %}
</div>
{% if alerts %}
<div class="section">
<h2 class="section-title">Alerts</h2>
<table role="presentation" class="alert-list" width="100%" cellpadding="0" cellspacing="0" border="0">
{% for alert in alerts %}
<tr><td class="alert-item">
{% if alert.title %}
<p class="alert-item-title">{{ alert.title }}</p>
{% endif %}
<p class="alert-item-message">{{ alert.message }}</p>
</td></tr>
{% endfor %}
</table>
</div>
{% endif %}
{% if notes %}
<div class="section">
<p class="notes">{{ notes }}</p>
</div>
{% endif %}
"#;

pub const EXECUTIVE_SUMMARY: &str = r#"<table role="presentation" class="header-banner" width="100%" cellpadding="0" cellspacing="0" border="0">
<tr><td class="header-cell">
<p class="header-eyebrow">Executive Summary</p>
<h1 class="header-title">{{ period }}</h1>
<p class="header-subtitle">{{ kpi_count }} key indicators{% if location_count %} across {{ location_count }} locations{% endif %}</p>
</td></tr>
</table>
<div class="section">
<h2 class="section-title">Key Indicators</h2>
<table role="presentation" class="kpi-grid" width="100%" cellpadding="0" cellspacing="0" border="0">
{% for row in kpi_rows %}
<tr>
{% for kpi in row %}
<td class="kpi-cell" width="33%" valign="top">
<div class="kpi-card">
<p class="kpi-label">{{ kpi.label }}</p>
<p class="kpi-value">{{ kpi.value }}</p>
{% if kpi.change %}
<p class="kpi-change change-{{ kpi.trend }}">{{ kpi.arrow }} {{ kpi.change }}</p>
{% endif %}
</div>
</td>
{% endfor %}
</tr>
{% endfor %}
</table>
</div>
{% if highlights %}
<div class="section">
<h2 class="section-title">Highlights</h2>
<ul class="highlight-list">
{% for item in highlights %}
<li class="highlight-item">{{ item }}</li>
{% endfor %}
</ul>
</div>
{% endif %}
{% if locations %}
<div class="section">
<h2 class="section-title">By Location</h2>
<table role="presentation" class="data-table" width="100%" cellpadding="0" cellspacing="0" border="0">
<tr>
<th class="table-header" align="left">Location</th>
<th class="table-header table-cell-num">Production</th>
<th class="table-header table-cell-num">Collections</th>
<th class="table-header table-cell-num">Collection Rate</th>
</tr>
{% for location in locations %}
<tr>
<td class="table-cell{% if location.alt %} table-cell-alt{% endif %}"><span class="provider-name">{{ location.name }}</span></td>
<td class="table-cell table-cell-num{% if location.alt %} table-cell-alt{% endif %}">{{ location.production }}</td>
<td class="table-cell table-cell-num{% if location.alt %} table-cell-alt{% endif %}">{{ location.collections }}</td>
<td class="table-cell table-cell-num{% if location.alt %} table-cell-alt{% endif %}">{{ location.rate or "&#8212;" }}</td>
</tr>
{% endfor %}
</table>
</div>
{% endif %}
{% if notes %}
<div class="section">
<p class="notes">{{ notes }}</p>
</div>
{% endif %}
"#;

pub const PROVIDER_UPDATE: &str = r#"<table role="presentation" class="header-banner" width="100%" cellpadding="0" cellspacing="0" border="0">
<tr><td class="header-cell">
<p class="header-eyebrow">Provider Update</p>
<h1 class="header-title">{{ provider_name }}</h1>
{% if location %}
<p class="header-subtitle">{{ location }}</p>
{% endif %}
</td></tr>
</table>
<div class="section">
<h2 class="section-title">Updates</h2>
<table role="presentation" class="update-list" width="100%" cellpadding="0" cellspacing="0" border="0">
{% for update in updates %}
<tr><td class="update-item">
<p class="update-title">{{ update.title }}</p>
<p class="update-detail">{{ update.detail }}</p>
</td></tr>
{% endfor %}
</table>
{% if effective_date %}
<span class="effective-date">Effective {{ effective_date }}</span>
{% endif %}
</div>
{% if notes %}
<div class="section">
<p class="notes">{{ notes }}</p>
</div>
{% endif %}
"#;

pub const ALERT_NOTIFICATION: &str = r#"<table role="presentation" class="alert-banner alert-{{ urgency }}" style="border-left-color: var(--{{ color }});" width="100%" cellpadding="0" cellspacing="0" border="0">
<tr><td class="alert-cell">
<p class="alert-eyebrow"><span class="alert-icon">{{ icon }}</span> {{ urgency_copy }}</p>
<h1 class="alert-title">{{ title }}</h1>
<p class="alert-type">{{ alert_type }}{% if location %} &#183; {{ location }}{% endif %}</p>
</td></tr>
</table>
<div class="alert-body">
<p class="alert-message">{{ message }}</p>
{% if details %}
<ul class="detail-list">
{% for detail in details %}
<li class="detail-item">{{ detail }}</li>
{% endfor %}
</ul>
{% endif %}
{% if action_url %}
<table role="presentation" class="button-table" cellpadding="0" cellspacing="0" border="0">
<tr><td class="button-cell"><a class="button" href="{{ action_url }}">Review details</a></td></tr>
</table>
{% endif %}
{% if escalate %}
<table role="presentation" class="escalation-box" width="100%" cellpadding="0" cellspacing="0" border="0">
<tr><td class="escalation-cell">
<p class="escalation-title">Escalation</p>
<p class="escalation-text">Please respond within {{ response_window }}. If you cannot resolve this, contact {{ contact.name }} at {{ contact.phone }} or <a class="escalation-link" href="mailto:{{ contact.email }}">{{ contact.email }}</a>.</p>
</td></tr>
</table>
{% endif %}
</div>
"#;

pub const SIGNATURE: &str = r#"<table role="presentation" class="signature" width="100%" cellpadding="0" cellspacing="0" border="0">
<tr><td class="signature-cell">
{% for line in lines %}
<p class="{{ 'signature-text' if loop.first else 'signature-line' }}">{{ line }}</p>
{% endfor %}
</td></tr>
</table>
"#;

/// Built-in templates by name.
pub const TEMPLATES: &[(&str, &str)] = &[
    ("practice_report", PRACTICE_REPORT),
    ("executive_summary", EXECUTIVE_SUMMARY),
    ("provider_update", PROVIDER_UPDATE),
    ("alert_notification", ALERT_NOTIFICATION),
    ("signature", SIGNATURE),
];

// SPDX-License-Identifier: PMPL-1.0-or-later
//! Action card rendering for SonarQube analysis results
//!
//! A [`ScanReport`] is rendered through [`CardTemplate`]. The body is driven
//! by [`REPORT_LINES`], so adding a metric to the card means adding a row to
//! that table.

use crate::config::CardConfig;
use crate::dingtalk::{dingtalk_link, ActionButton, ActionCard, ChatMessage};
use crate::sonar::{Measures, MetricKind, QualityGate};

/// Everything a card is rendered from
#[derive(Debug, Clone)]
pub struct ScanReport {
    pub project_name: String,
    pub project_key: String,
    pub server_url: String,
    pub measures: Measures,
}

impl ScanReport {
    pub fn dashboard_url(&self) -> String {
        format!("{}/dashboard?id={}", self.server_base(), self.project_key)
    }

    pub fn pdf_report_url(&self) -> String {
        format!(
            "{}/api/pdfreport/get?componentKey={}",
            self.server_base(),
            self.project_key
        )
    }

    fn server_base(&self) -> &str {
        self.server_url.trim_end_matches('/')
    }
}

/// One metric line of the card body: `<label>: <value><unit>`
#[derive(Debug, Clone, Copy)]
pub struct ReportLine {
    pub metric: MetricKind,
    pub label: &'static str,
    pub unit: &'static str,
}

impl ReportLine {
    const fn new(metric: MetricKind, label: &'static str, unit: &'static str) -> Self {
        Self { metric, label, unit }
    }

    pub fn render(&self, measures: &Measures) -> String {
        format!("{}: {}{}", self.label, measures.get(self.metric), self.unit)
    }
}

/// Metric lines in display order
pub const REPORT_LINES: [ReportLine; 10] = [
    ReportLine::new(MetricKind::Bugs, "BUG数", " 个"),
    ReportLine::new(MetricKind::Vulnerabilities, "漏洞数", " 个"),
    ReportLine::new(MetricKind::CodeSmells, "异味数", " 个"),
    ReportLine::new(MetricKind::Coverage, "测试覆盖率", "%"),
    ReportLine::new(MetricKind::DuplicatedLinesDensity, "代码重复率", "%"),
    ReportLine::new(MetricKind::BlockerViolations, "阻断blocker数", " 个"),
    ReportLine::new(MetricKind::CriticalViolations, "严重critical数", " 个"),
    ReportLine::new(MetricKind::MajorViolations, "主要major数", " 个"),
    ReportLine::new(MetricKind::MinorViolations, "次要minor数", " 个"),
    ReportLine::new(MetricKind::InfoViolations, "提示info数", " 个"),
];

const SECTION_HEADER: &str = "## 代码总体扫描结果";
const VIEW_RESULTS_BUTTON: &str = "点击查看分析结果WEB(需要浏览器登陆过sonarqube)";
const DOWNLOAD_REPORT_BUTTON: &str = "点击下载分析报告PDF(需要浏览器登陆过sonarqube)";

/// Vertical button layout
const BTN_ORIENTATION: &str = "0";

/// Card rendering settings
#[derive(Debug, Clone)]
pub struct CardTemplate {
    pub passing_image: String,
    pub failing_image: String,
    pub pc_slide: bool,
}

impl Default for CardTemplate {
    fn default() -> Self {
        Self::from(&CardConfig::default())
    }
}

impl From<&CardConfig> for CardTemplate {
    fn from(config: &CardConfig) -> Self {
        Self {
            passing_image: config.passing_image.clone(),
            failing_image: config.failing_image.clone(),
            pc_slide: config.pc_slide,
        }
    }
}

impl CardTemplate {
    /// Header image for a quality gate verdict; empty when it is unknown
    pub fn status_image(&self, gate: QualityGate) -> &str {
        match gate {
            QualityGate::Failed => self.failing_image.as_str(),
            QualityGate::Passed => self.passing_image.as_str(),
            QualityGate::Unknown => "",
        }
    }

    pub fn title(&self, report: &ScanReport) -> String {
        format!("仓库 {} 的代码静态扫描结果", report.project_name)
    }

    /// Markdown body. Always `3 + REPORT_LINES.len()` paragraphs.
    pub fn body(&self, report: &ScanReport) -> String {
        let image = self.status_image(report.measures.quality_gate());

        let mut lines = Vec::with_capacity(3 + REPORT_LINES.len());
        lines.push(format!("![head]({})", image));
        lines.push(format!("本次扫描仓库: {}", report.project_name));
        lines.push(SECTION_HEADER.to_string());
        lines.extend(REPORT_LINES.iter().map(|line| line.render(&report.measures)));

        lines.join("\n\n")
    }

    pub fn buttons(&self, report: &ScanReport) -> Vec<ActionButton> {
        vec![
            ActionButton {
                title: VIEW_RESULTS_BUTTON.to_string(),
                action_url: dingtalk_link(&report.dashboard_url(), self.pc_slide),
            },
            ActionButton {
                title: DOWNLOAD_REPORT_BUTTON.to_string(),
                action_url: dingtalk_link(&report.pdf_report_url(), self.pc_slide),
            },
        ]
    }

    pub fn render(&self, report: &ScanReport) -> ChatMessage {
        ChatMessage::action_card(ActionCard {
            title: self.title(report),
            text: self.body(report),
            btn_orientation: BTN_ORIENTATION.to_string(),
            btns: self.buttons(report),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(pairs: &[(MetricKind, &str)]) -> ScanReport {
        ScanReport {
            project_name: "demo-service".to_string(),
            project_key: "com.example:demo".to_string(),
            server_url: "https://sonar.example.com".to_string(),
            measures: pairs.iter().map(|(k, v)| (*k, v.to_string())).collect(),
        }
    }

    #[test]
    fn test_status_image_mapping() {
        let template = CardTemplate::default();
        assert_eq!(
            template.status_image(QualityGate::Passed),
            "http://s1.ax1x.com/2020/10/29/BGMeTe.png"
        );
        assert_eq!(
            template.status_image(QualityGate::Failed),
            "http://s1.ax1x.com/2020/10/29/BGMZwD.png"
        );
        assert_eq!(template.status_image(QualityGate::Unknown), "");
    }

    #[test]
    fn test_body_passing_gate() {
        let template = CardTemplate::default();
        let body = template.body(&report(&[
            (MetricKind::AlertStatus, "OK"),
            (MetricKind::Bugs, "0"),
            (MetricKind::Coverage, "87.5"),
        ]));

        assert!(body.starts_with("![head](http://s1.ax1x.com/2020/10/29/BGMeTe.png)\n\n"));
        assert!(body.contains("测试覆盖率: 87.5%"));
        assert!(body.contains("BUG数: 0 个"));
        assert!(body.contains("阻断blocker数:  个"));
        assert!(body.contains("严重critical数:  个"));
    }

    #[test]
    fn test_failed_gate_overrides_other_values() {
        let template = CardTemplate::default();
        let body = template.body(&report(&[
            (MetricKind::AlertStatus, "ERROR"),
            (MetricKind::Bugs, "0"),
            (MetricKind::Coverage, "100.0"),
        ]));
        assert!(body.starts_with("![head](http://s1.ax1x.com/2020/10/29/BGMZwD.png)"));
    }

    #[test]
    fn test_missing_metrics_keep_line_layout() {
        let template = CardTemplate::default();
        let body = template.body(&report(&[]));
        let lines: Vec<&str> = body.split("\n\n").collect();

        assert_eq!(lines.len(), 13);
        assert_eq!(lines[0], "![head]()");
        assert_eq!(lines[1], "本次扫描仓库: demo-service");
        assert_eq!(lines[2], "## 代码总体扫描结果");
        assert_eq!(lines[3], "BUG数:  个");
        assert_eq!(lines[6], "测试覆盖率: %");
        assert_eq!(lines[7], "代码重复率: %");
        assert_eq!(lines[12], "提示info数:  个");
    }

    #[test]
    fn test_body_full_layout() {
        let template = CardTemplate::default();
        let body = template.body(&report(&[
            (MetricKind::AlertStatus, "OK"),
            (MetricKind::Bugs, "1"),
            (MetricKind::Vulnerabilities, "2"),
            (MetricKind::CodeSmells, "3"),
            (MetricKind::Coverage, "4.5"),
            (MetricKind::DuplicatedLinesDensity, "6.7"),
            (MetricKind::BlockerViolations, "8"),
            (MetricKind::CriticalViolations, "9"),
            (MetricKind::MajorViolations, "10"),
            (MetricKind::MinorViolations, "11"),
            (MetricKind::InfoViolations, "12"),
            (MetricKind::Ncloc, "3400"),
        ]));

        let expected = [
            "![head](http://s1.ax1x.com/2020/10/29/BGMeTe.png)",
            "本次扫描仓库: demo-service",
            "## 代码总体扫描结果",
            "BUG数: 1 个",
            "漏洞数: 2 个",
            "异味数: 3 个",
            "测试覆盖率: 4.5%",
            "代码重复率: 6.7%",
            "阻断blocker数: 8 个",
            "严重critical数: 9 个",
            "主要major数: 10 个",
            "次要minor数: 11 个",
            "提示info数: 12 个",
        ]
        .join("\n\n");
        assert_eq!(body, expected);
    }

    #[test]
    fn test_render_is_deterministic() {
        let template = CardTemplate::default();
        let report = report(&[
            (MetricKind::AlertStatus, "OK"),
            (MetricKind::Bugs, "5"),
            (MetricKind::MinorViolations, "7"),
            (MetricKind::Coverage, "50.0"),
        ]);
        let first = serde_json::to_string(&template.render(&report)).unwrap();
        let second = serde_json::to_string(&template.render(&report)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_render_title_and_buttons() {
        let template = CardTemplate::default();
        let msg = template.render(&report(&[]));

        assert_eq!(msg.msgtype, "actionCard");
        assert_eq!(msg.action_card.title, "仓库 demo-service 的代码静态扫描结果");
        assert_eq!(msg.action_card.btn_orientation, "0");
        assert_eq!(msg.action_card.btns.len(), 2);
        assert_eq!(
            msg.action_card.btns[0].action_url,
            dingtalk_link("https://sonar.example.com/dashboard?id=com.example:demo", false)
        );
        assert_eq!(
            msg.action_card.btns[1].action_url,
            dingtalk_link(
                "https://sonar.example.com/api/pdfreport/get?componentKey=com.example:demo",
                false
            )
        );
    }

    #[test]
    fn test_pc_slide_applies_to_both_buttons() {
        let template = CardTemplate {
            pc_slide: true,
            ..CardTemplate::default()
        };
        let buttons = template.buttons(&report(&[]));
        assert!(buttons.iter().all(|b| b.action_url.contains("pcSlide=true")));
    }
}

use chrono::{DateTime, Local};

use crate::core::error::DashResult;
use crate::core::models::{GatewayStatus, TunnelStatus};

#[derive(Debug, Clone, PartialEq)]
pub struct GatewayLine {
    pub label: &'static str,
    pub value: String,
    pub healthy: bool,
}

/// Gateway domain: liveness of the backend and the tunnel in front of it.
#[derive(Default)]
pub struct GatewayView {
    health: Option<GatewayStatus>,
    tunnel: Option<TunnelStatus>,
    reachable: Option<bool>,
    last_checked: Option<DateTime<Local>>,
}

impl GatewayView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Failures are already in the activity feed; here they only flip the
    /// reachability flag. A failed tunnel probe keeps the previous status.
    pub fn apply(&mut self, health: DashResult<GatewayStatus>, tunnel: DashResult<TunnelStatus>) {
        self.last_checked = Some(Local::now());
        match health {
            Ok(status) => {
                self.reachable = Some(true);
                self.health = Some(status);
            }
            Err(_) => {
                self.reachable = Some(false);
            }
        }
        if let Ok(tunnel) = tunnel {
            self.tunnel = Some(tunnel);
        }
    }

    pub fn is_reachable(&self) -> Option<bool> {
        self.reachable
    }

    pub fn view(&self) -> Vec<GatewayLine> {
        let mut lines = Vec::new();
        let (api_value, api_ok) = match (self.reachable, &self.health) {
            (None, _) => ("checking...".to_string(), true),
            (Some(false), _) => ("unreachable".to_string(), false),
            (Some(true), Some(h)) => (h.status.clone(), h.status.eq_ignore_ascii_case("ok")),
            (Some(true), None) => ("reachable".to_string(), true),
        };
        lines.push(GatewayLine {
            label: "API",
            value: api_value,
            healthy: api_ok,
        });

        if let Some(tunnel) = &self.tunnel {
            lines.push(GatewayLine {
                label: "Tunnel",
                value: tunnel.status.replace('_', " "),
                healthy: tunnel.is_running(),
            });
            if let Some(id) = &tunnel.tunnel_id {
                lines.push(GatewayLine {
                    label: "Tunnel ID",
                    value: id.clone(),
                    healthy: true,
                });
            }
            if let Some(uptime) = tunnel.uptime {
                lines.push(GatewayLine {
                    label: "Uptime",
                    value: format_uptime(uptime),
                    healthy: true,
                });
            }
            if let Some(pid) = tunnel.pid {
                lines.push(GatewayLine {
                    label: "PID",
                    value: pid.to_string(),
                    healthy: true,
                });
            }
            if let Some(err) = &tunnel.error {
                lines.push(GatewayLine {
                    label: "Tunnel error",
                    value: err.clone(),
                    healthy: false,
                });
            }
        }

        if let Some(at) = self.last_checked {
            lines.push(GatewayLine {
                label: "Checked",
                value: at.format("%H:%M:%S").to_string(),
                healthy: true,
            });
        }
        lines
    }
}

pub fn format_uptime(secs: u64) -> String {
    let days = secs / 86_400;
    let hours = (secs % 86_400) / 3_600;
    let minutes = (secs % 3_600) / 60;
    if days > 0 {
        format!("{}d {}h {}m", days, hours, minutes)
    } else if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m {}s", minutes, secs % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::DashboardError;

    fn offline() -> DashboardError {
        DashboardError::Network {
            status: 0,
            message: "connection refused".into(),
        }
    }

    #[test]
    fn unchecked_gateway_reports_checking() {
        let view = GatewayView::new();
        assert_eq!(view.view()[0].value, "checking...");
        assert_eq!(view.is_reachable(), None);
    }

    #[test]
    fn failed_health_probe_marks_unreachable() {
        let mut gw = GatewayView::new();
        gw.apply(
            Ok(GatewayStatus {
                status: "OK".into(),
                timestamp: 1.0,
            }),
            Ok(TunnelStatus {
                status: "running".into(),
                uptime: Some(3_725),
                ..Default::default()
            }),
        );
        assert_eq!(gw.is_reachable(), Some(true));
        gw.apply(Err(offline()), Err(offline()));
        assert_eq!(gw.is_reachable(), Some(false));
        let lines = gw.view();
        assert_eq!(lines[0].value, "unreachable");
        assert!(!lines[0].healthy);
        // Previous tunnel status survives a failed probe.
        assert!(lines.iter().any(|l| l.label == "Uptime" && l.value == "1h 2m"));
    }

    #[test]
    fn uptime_formatting() {
        assert_eq!(format_uptime(59), "0m 59s");
        assert_eq!(format_uptime(90_061), "1d 1h 1m");
    }
}

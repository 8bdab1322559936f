//! Hyper-V client that runs PowerShell on the host through the system `ssh`

use crate::config::schema::ServerConfig;
use crate::error::{HvError, HvResult};
use crate::hyperv::client::HypervisorClient;
use crate::hyperv::model::{self, Snapshot};
use crate::hyperv::powershell;
use crate::inventory::MachineRecord;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;
use uuid::Uuid;

/// Remote Hyper-V host reached over OpenSSH
#[derive(Debug, Clone)]
pub struct SshHypervisor {
    host: String,
    login: Option<String>,
    port: u16,
    ssh_options: Vec<String>,
}

impl SshHypervisor {
    /// Build a client from server settings; fails if no host is configured
    pub fn new(server: &ServerConfig) -> HvResult<Self> {
        let host = server
            .host
            .clone()
            .filter(|h| !h.is_empty())
            .ok_or(HvError::HostNotConfigured)?;

        let login = server.user.as_ref().map(|user| match &server.domain {
            Some(domain) if !domain.is_empty() => format!("{}\\{}", domain, user),
            _ => user.clone(),
        });

        Ok(Self {
            host,
            login,
            port: server.port,
            ssh_options: server.ssh_options.clone(),
        })
    }

    /// Arguments passed to `ssh` to run `script` on the host
    fn ssh_args(&self, script: &str) -> Vec<String> {
        let mut args = vec!["-p".to_string(), self.port.to_string()];
        for option in &self.ssh_options {
            args.push("-o".to_string());
            args.push(option.clone());
        }
        if let Some(login) = &self.login {
            args.push("-l".to_string());
            args.push(login.clone());
        }
        args.push(self.host.clone());
        args.extend(
            [
                "powershell",
                "-NoProfile",
                "-NonInteractive",
                "-EncodedCommand",
            ]
            .map(String::from),
        );
        args.push(powershell::encode(script));
        args
    }

    /// Run a script and return its stdout; `label` names it in errors
    async fn exec(&self, label: &str, script: &str) -> HvResult<String> {
        debug!("Executing on {}: {}", self.host, script);

        let output = Command::new("ssh")
            .args(self.ssh_args(script))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| {
                if e.kind() == ErrorKind::NotFound {
                    HvError::SshNotFound
                } else {
                    HvError::io(format!("running ssh {}", self.host), e)
                }
            })?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).into_owned())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(HvError::remote(label, stderr.trim()))
        }
    }
}

#[async_trait]
impl HypervisorClient for SshHypervisor {
    async fn fetch_machines(&self, name_filter: Option<&str>) -> HvResult<Vec<MachineRecord>> {
        let stdout = self.exec("Get-VM", &powershell::get_vm(name_filter)).await?;
        model::parse_machines(&stdout)
    }

    async fn fetch_machine(&self, id: Uuid) -> HvResult<Option<MachineRecord>> {
        let stdout = self.exec("Get-VM", &powershell::get_vm_by_id(id)).await?;
        Ok(model::parse_machines(&stdout)?.into_iter().next())
    }

    async fn fetch_snapshots(&self, id: Uuid) -> HvResult<Vec<Snapshot>> {
        let stdout = self.exec("Get-VMSnapshot", &powershell::get_snapshots(id)).await?;
        model::parse_json_list(&stdout)
    }

    async fn start(&self, id: Uuid) -> HvResult<()> {
        self.exec("Start-VM", &powershell::start_vm(id)).await.map(drop)
    }

    async fn stop(&self, id: Uuid, force: bool) -> HvResult<()> {
        self.exec("Stop-VM", &powershell::stop_vm(id, force)).await.map(drop)
    }

    async fn pause(&self, id: Uuid) -> HvResult<()> {
        self.exec("Suspend-VM", &powershell::suspend_vm(id)).await.map(drop)
    }

    async fn resume(&self, id: Uuid) -> HvResult<()> {
        self.exec("Resume-VM", &powershell::resume_vm(id)).await.map(drop)
    }

    async fn create_snapshot(&self, id: Uuid, snapshot: &str) -> HvResult<()> {
        self.exec("Checkpoint-VM", &powershell::checkpoint_vm(id, snapshot))
            .await
            .map(drop)
    }

    async fn restore_snapshot(&self, id: Uuid, snapshot: &str) -> HvResult<()> {
        self.exec(
            "Restore-VMSnapshot",
            &powershell::restore_snapshot(id, snapshot),
        )
        .await
        .map(drop)
    }

    async fn remove_snapshot(&self, id: Uuid, snapshot: &str, recursive: bool) -> HvResult<()> {
        self.exec(
            "Remove-VMSnapshot",
            &powershell::remove_snapshot(id, snapshot, recursive),
        )
        .await
        .map(drop)
    }

    fn endpoint(&self) -> String {
        match &self.login {
            Some(login) => format!("{}@{}:{}", login, self.host, self.port),
            None => format!("{}:{}", self.host, self.port),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server(host: Option<&str>) -> ServerConfig {
        ServerConfig {
            host: host.map(String::from),
            ..ServerConfig::default()
        }
    }

    #[test]
    fn requires_host() {
        assert!(matches!(
            SshHypervisor::new(&server(None)),
            Err(HvError::HostNotConfigured)
        ));
        assert!(matches!(
            SshHypervisor::new(&server(Some(""))),
            Err(HvError::HostNotConfigured)
        ));
    }

    #[test]
    fn login_includes_domain() {
        let mut config = server(Some("hv01"));
        config.user = Some("admin".to_string());
        config.domain = Some("CORP".to_string());

        let client = SshHypervisor::new(&config).unwrap();
        assert_eq!(client.endpoint(), "CORP\\admin@hv01:22");
    }

    #[test]
    fn ssh_args_layout() {
        let mut config = server(Some("hv01.example.com"));
        config.user = Some("ops".to_string());
        config.port = 2222;
        config.ssh_options = vec!["ConnectTimeout=5".to_string()];

        let client = SshHypervisor::new(&config).unwrap();
        let args = client.ssh_args("Get-VM");

        assert_eq!(
            &args[..8],
            &[
                "-p",
                "2222",
                "-o",
                "ConnectTimeout=5",
                "-l",
                "ops",
                "hv01.example.com",
                "powershell"
            ]
        );
        assert_eq!(args[args.len() - 2], "-EncodedCommand");
        assert_eq!(args[args.len() - 1], powershell::encode("Get-VM"));
    }

    #[test]
    fn endpoint_without_user() {
        let client = SshHypervisor::new(&server(Some("hv01"))).unwrap();
        assert_eq!(client.endpoint(), "hv01:22");
    }
}

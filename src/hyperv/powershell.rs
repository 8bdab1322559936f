//! PowerShell script builders for the Hyper-V module
//!
//! Scripts are sent with `-EncodedCommand`, so the only quoting that
//! matters is PowerShell's own single-quoted string literal.

use base64::Engine;
use uuid::Uuid;

/// Suppress progress records, which otherwise leak into stdout as CLIXML
const PREAMBLE: &str = "$ProgressPreference = 'SilentlyContinue'; ";

/// Quote `value` as a PowerShell single-quoted literal
pub fn quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('\'');
    for c in value.chars() {
        // Typographic single quotes also terminate a literal
        if matches!(c, '\'' | '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{201B}') {
            quoted.push(c);
        }
        quoted.push(c);
    }
    quoted.push('\'');
    quoted
}

/// Encode a script for `powershell -EncodedCommand` (base64 of UTF-16LE)
pub fn encode(script: &str) -> String {
    let bytes: Vec<u8> = script.encode_utf16().flat_map(u16::to_le_bytes).collect();
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

fn json_array(pipeline: &str) -> String {
    format!(
        "{}ConvertTo-Json -Compress -Depth 3 -InputObject @({})",
        PREAMBLE, pipeline
    )
}

const VM_FIELDS: &str = "Select-Object Name, \
     @{Name='Id';Expression={$_.Id.ToString()}}, \
     @{Name='State';Expression={[int]$_.State}}, \
     @{Name='Uptime';Expression={$_.Uptime.ToString()}}, \
     Status, CPUUsage, MemoryAssigned";

/// The single machine with `id`; the script fails if it is gone
fn vm(id: Uuid) -> String {
    format!("(Get-VM -Id {} -ErrorAction Stop)", quote(&id.to_string()))
}

/// `Get-VM`, optionally by name; a missing name yields an empty array
pub fn get_vm(name_filter: Option<&str>) -> String {
    let name = name_filter
        .map(|n| format!(" -Name {}", quote(n)))
        .unwrap_or_default();
    json_array(&format!(
        "Get-VM{} -ErrorAction SilentlyContinue | {}",
        name, VM_FIELDS
    ))
}

/// `Get-VM` for one id; an unknown id yields an empty array
pub fn get_vm_by_id(id: Uuid) -> String {
    json_array(&format!(
        "Get-VM -Id {} -ErrorAction SilentlyContinue | {}",
        quote(&id.to_string()),
        VM_FIELDS
    ))
}

pub fn get_snapshots(id: Uuid) -> String {
    json_array(&format!(
        "Get-VMSnapshot -VM {} -ErrorAction Stop | Select-Object Name, ParentSnapshotName, \
         @{{Name='CreationTime';Expression={{$_.CreationTime.ToString('yyyy-MM-dd HH:mm:ss')}}}}",
        vm(id)
    ))
}

fn command(cmdlet: &str, args: &str) -> String {
    format!("{}{} {} -ErrorAction Stop", PREAMBLE, cmdlet, args)
}

pub fn start_vm(id: Uuid) -> String {
    command("Start-VM", &format!("-VM {}", vm(id)))
}

pub fn stop_vm(id: Uuid, force: bool) -> String {
    let force = if force { " -Force" } else { "" };
    command("Stop-VM", &format!("-VM {}{}", vm(id), force))
}

pub fn suspend_vm(id: Uuid) -> String {
    command("Suspend-VM", &format!("-VM {}", vm(id)))
}

pub fn resume_vm(id: Uuid) -> String {
    command("Resume-VM", &format!("-VM {}", vm(id)))
}

pub fn checkpoint_vm(id: Uuid, snapshot: &str) -> String {
    command(
        "Checkpoint-VM",
        &format!("-VM {} -SnapshotName {}", vm(id), quote(snapshot)),
    )
}

pub fn restore_snapshot(id: Uuid, snapshot: &str) -> String {
    command(
        "Restore-VMSnapshot",
        &format!("-VM {} -Name {} -Confirm:$false", vm(id), quote(snapshot)),
    )
}

pub fn remove_snapshot(id: Uuid, snapshot: &str, recursive: bool) -> String {
    let children = if recursive {
        " -IncludeAllChildSnapshots"
    } else {
        ""
    };
    command(
        "Remove-VMSnapshot",
        &format!(
            "-VM {} -Name {}{} -Confirm:$false",
            vm(id),
            quote(snapshot),
            children
        ),
    )
}

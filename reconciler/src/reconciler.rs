use gitpolicy_git_config::GitCli;
use gitpolicy_git_config::GitProperty;
use gitpolicy_git_config::LiveConfigSnapshot;
use gitpolicy_policy::GitPolicy;
use gitpolicy_policy::HostedServerConfig;
use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::ReconcileError;
use crate::ReconcileReport;

/// Brings the machine's global git configuration in line with a [`GitPolicy`].
///
/// A run goes through these stages, strictly in order and one git invocation
/// at a time:
///
/// 1. check that git can be executed at all (fatal if not);
/// 2. read the global configuration, writing `wtmp.ignoreSChannel=false` and
///    reading it again if that key has never been set;
/// 3. ensure `http.sslBackend`, unless `wtmp.ignoreSChannel` is `true`;
/// 4. for every hosted server in document order, ensure its four credential
///    properties, unless its `wtmp.<url>.ignore` key is `true`.
///
/// "Ensure" writes a property only when the snapshot does not already hold
/// exactly the desired value. Writes made in stages 3 and 4 are not folded
/// back into the snapshot; only the first-contact write of stage 2 is
/// observed, through the second read.
pub struct Reconciler {
    git: GitCli,
    policy: GitPolicy,
}

impl Reconciler {
    pub fn new(git: GitCli, policy: GitPolicy) -> Self {
        Self { git, policy }
    }

    pub fn policy(&self) -> &GitPolicy {
        &self.policy
    }

    pub async fn run(&self) -> Result<ReconcileReport, ReconcileError> {
        info!("Configuring Git");
        if !self.git.is_executable().await? {
            return Err(ReconcileError::GitUnavailable {
                program: self.git.program_name().to_string(),
            });
        }
        info!("Git CLI present");

        let mut report = ReconcileReport::default();
        let snapshot = self.load_snapshot(&mut report).await?;

        self.reconcile_ssl_backend(&snapshot, &mut report).await?;
        for (index, server) in self.policy.hosted_servers().iter().enumerate() {
            self.reconcile_hosted_server(index, server, &snapshot, &mut report)
                .await?;
        }

        info!(
            "Git configuration complete: {} written, {} failed, {} host(s) skipped",
            report.applied.len(),
            report.failed.len(),
            report.skipped_hosts.len()
        );
        Ok(report)
    }

    async fn load_snapshot(
        &self,
        report: &mut ReconcileReport,
    ) -> Result<LiveConfigSnapshot, ReconcileError> {
        let mut snapshot = self.git.list_global().await?;
        debug!("global git config has {} entries", snapshot.len());

        let bootstrap = self.policy.schannel_bootstrap_property();
        if !snapshot.contains_key(bootstrap.key()) {
            info!("Setting {} to default {}", bootstrap.key(), bootstrap.value());
            self.ensure(&snapshot, &bootstrap, report).await?;
            snapshot = self.git.list_global().await?;
            debug!("updated global git config has {} entries", snapshot.len());
            report.bootstrapped = snapshot.contains_key(bootstrap.key());
        }

        if !snapshot.contains_key(bootstrap.key()) {
            warn!(
                "Failed to update git global config! Git autoconfiguration may not work. Trying to continue."
            );
        }
        Ok(snapshot)
    }

    async fn reconcile_ssl_backend(
        &self,
        snapshot: &LiveConfigSnapshot,
        report: &mut ReconcileReport,
    ) -> Result<(), ReconcileError> {
        if snapshot.contains_property(&self.policy.ignore_schannel_property()) {
            info!("Skipping SSLBackend configuration.");
            report.ssl_backend_skipped = true;
            return Ok(());
        }
        debug!("Setting sslBackend property");
        self.ensure(snapshot, &self.policy.ssl_backend_property(), report)
            .await
    }

    async fn reconcile_hosted_server(
        &self,
        index: usize,
        server: &HostedServerConfig,
        snapshot: &LiveConfigSnapshot,
        report: &mut ReconcileReport,
    ) -> Result<(), ReconcileError> {
        let missing_url = |_| ReconcileError::MissingServerUrl { index };
        let ignore = server.ignore_property().map_err(missing_url)?;
        let url = server.url().map(ToString::to_string).unwrap_or_default();
        info!("Configuring Gitlab: {url}");

        if snapshot.contains_property(&ignore) {
            info!("Skipping autoconfiguration for Gitlab instance: {url}");
            report.skipped_hosts.push(url);
            return Ok(());
        }

        for property in server.managed_properties().map_err(missing_url)? {
            self.ensure(snapshot, &property, report).await?;
        }
        Ok(())
    }

    async fn ensure(
        &self,
        snapshot: &LiveConfigSnapshot,
        property: &GitProperty,
        report: &mut ReconcileReport,
    ) -> Result<(), ReconcileError> {
        if snapshot.contains_property(property) {
            debug!("{} already set", property.key());
            return Ok(());
        }
        let output = self.git.set_global(property).await?;
        let key = property.key().to_string();
        if output.success() {
            report.applied.push(key);
        } else {
            report.failed.push(key);
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "reconciler_tests.rs"]
mod tests;

//! Switch facade: vendor-aware operations that produce typed records.

use std::collections::HashMap;

use indexmap::IndexMap;
use log::{debug, info, warn};
use regex::Regex;

use crate::collector::{PollSettings, PollingCollector, select_tdr_targets};
use crate::error::{Result, SessionError};
use crate::extract::{ExtractOptions, PatternMatcher, TextFsmMatcher, extract};
use crate::model::{InterfaceLldp, InterfaceOptics, InterfaceStatus, InterfaceTdr, MediaInfo, PoeStatus};
use crate::normalize::{FieldTable, NormalizedRow};
use crate::platform::{OpticsCommand, VendorProfile};
use crate::session::{
    CommandOptions, ConfigOptions, ConfigResponse, Response, ResponseGroup, Session,
};
use crate::template::TemplateResolver;
use crate::transport::Connector;

/// Which template parses an operation's output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TemplateChoice {
    /// The vendor's built-in template.
    #[default]
    Default,
    /// A built-in name, a file path or inline template source.
    Custom(String),
    /// Return raw responses only.
    Skip,
}

/// TDR results plus the interfaces that never finished.
#[derive(Debug, Clone)]
pub struct TdrReport {
    pub group: ResponseGroup<IndexMap<String, InterfaceTdr>>,
    pub incomplete: Vec<String>,
}

/// A network switch reached through a [`Session`].
pub struct Switch<C: Connector, M: PatternMatcher = TextFsmMatcher> {
    session: Session<C>,
    profile: VendorProfile,
    resolver: TemplateResolver,
    matcher: M,
    fields: FieldTable,
    poll: PollSettings,
    hostname: Option<String>,
}

impl<C: Connector> Switch<C, TextFsmMatcher> {
    /// Create a switch using the TextFSM matcher.
    pub fn new(session: Session<C>, profile: VendorProfile) -> Self {
        Self::with_matcher(session, profile, TextFsmMatcher)
    }
}

impl<C: Connector, M: PatternMatcher> Switch<C, M> {
    pub fn with_matcher(session: Session<C>, profile: VendorProfile, matcher: M) -> Self {
        Self {
            session,
            profile,
            resolver: TemplateResolver::default(),
            matcher,
            fields: FieldTable::standard(),
            poll: PollSettings::default(),
            hostname: None,
        }
    }

    /// Use a custom resolver (e.g. with extra fragments).
    pub fn with_resolver(mut self, resolver: TemplateResolver) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn with_field_table(mut self, fields: FieldTable) -> Self {
        self.fields = fields;
        self
    }

    pub fn with_poll_settings(mut self, poll: PollSettings) -> Self {
        self.poll = poll;
        self
    }

    pub fn session(&self) -> &Session<C> {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session<C> {
        &mut self.session
    }

    pub fn into_session(self) -> Session<C> {
        self.session
    }

    pub fn profile(&self) -> &VendorProfile {
        &self.profile
    }

    /// Device hostname if known, otherwise the connection host.
    pub fn hostname(&self) -> &str {
        self.hostname.as_deref().unwrap_or(self.session.host())
    }

    /// Run the vendor's preparation commands (paging off, enable).
    pub async fn prepare(&mut self) -> Result<Vec<Response>> {
        let commands = self.profile.preparation_commands.clone();
        let mut responses = Vec::with_capacity(commands.len());
        for command in &commands {
            responses.push(self.session.send_command(command).await?);
        }
        debug!("[{}] ran {} preparation command(s)", self.session.host(), commands.len());
        Ok(responses)
    }

    /// Read the hostname from the running configuration.
    pub async fn refresh_hostname(&mut self) -> Result<Option<String>> {
        let pattern = compile(&self.profile.quirks.hostname_pattern)?;
        let command = self.profile.commands.hostname.clone();
        let response = self.session.send_command(&command).await?;

        if response.is_success() {
            if let Some(name) = pattern.captures(&response.result).and_then(|c| c.get(1)) {
                info!("[{}] hostname is {}", self.session.host(), name.as_str());
                self.hostname = Some(name.as_str().to_string());
            }
        }
        Ok(self.hostname.clone())
    }

    pub async fn get_running_config(&mut self) -> Result<Response> {
        let command = self.profile.commands.running_config.clone();
        self.session
            .command(&command, &CommandOptions::default())
            .await
    }

    /// Persist the running configuration.
    pub async fn write_memory(&mut self) -> Result<Response> {
        let command = self.profile.commands.save.clone();
        self.session.send_command(&command).await
    }

    pub async fn send_config<S: AsRef<str>>(
        &mut self,
        lines: &[S],
        options: &ConfigOptions,
    ) -> Result<ConfigResponse> {
        self.session.send_config(lines, options).await
    }

    /// Interface status keyed by interface name.
    pub async fn get_interface_status(
        &mut self,
        template: TemplateChoice,
    ) -> Result<ResponseGroup<IndexMap<String, InterfaceStatus>>> {
        let command = self.profile.commands.interface_status.clone();
        let status = self.session.send_command(&command).await?;
        let mut responses = vec![status.clone()];

        let description = match self.profile.commands.interface_description.clone() {
            Some(command) if template != TemplateChoice::Skip => {
                let response = self.session.send_command(&command).await?;
                responses.push(response.clone());
                Some(response)
            }
            _ => None,
        };

        let default = self.profile.templates.interface_status.clone();
        let records = match self.parse(&template, &default, &[&status], &ExtractOptions::new())? {
            Some(rows) => {
                let mut statuses = IndexMap::new();
                for row in &rows {
                    let record = InterfaceStatus::from_row(self.hostname(), row)?;
                    statuses.insert(record.interface.clone(), record);
                }
                if let (Some(response), Some(name)) = (
                    description,
                    self.profile.templates.interface_description.clone(),
                ) {
                    self.merge_descriptions(&mut statuses, &response, &name)?;
                }
                Some(statuses)
            }
            None => None,
        };

        Ok(ResponseGroup::new(responses, records)
            .with_description(format!("{} interface status", self.hostname())))
    }

    fn merge_descriptions(
        &self,
        statuses: &mut IndexMap<String, InterfaceStatus>,
        response: &Response,
        template: &str,
    ) -> Result<()> {
        let choice = TemplateChoice::Custom(template.to_string());
        let Some(rows) = self.parse(&choice, template, &[response], &ExtractOptions::new())? else {
            return Ok(());
        };
        for row in &rows {
            let (Some(interface), Some(text)) = (row.text("interface"), row.text("description"))
            else {
                continue;
            };
            if let Some(status) = statuses.get_mut(&interface) {
                status.description = Some(text);
            }
        }
        Ok(())
    }

    /// Port media keyed by interface name.
    ///
    /// Vendors without a media command report the media column of the
    /// interface status instead. That status call always uses the built-in
    /// status template, since a custom `template` describes media output;
    /// [`TemplateChoice::Skip`] is still honored.
    pub async fn get_media(
        &mut self,
        template: TemplateChoice,
    ) -> Result<ResponseGroup<IndexMap<String, MediaInfo>>> {
        let (Some(command), Some(default)) = (
            self.profile.commands.media.clone(),
            self.profile.templates.media.clone(),
        ) else {
            let status_choice = match template {
                TemplateChoice::Skip => TemplateChoice::Skip,
                TemplateChoice::Default | TemplateChoice::Custom(_) => TemplateChoice::Default,
            };
            let status = self.get_interface_status(status_choice).await?;
            let host = self.hostname().to_string();
            let records = status.records.map(|statuses| {
                statuses
                    .into_iter()
                    .map(|(interface, status)| {
                        let media = MediaInfo {
                            host: host.clone(),
                            interface: interface.clone(),
                            media_type: status.media,
                            vendor: None,
                            part_number: None,
                            serial: None,
                        };
                        (interface, media)
                    })
                    .collect()
            });
            return Ok(ResponseGroup::new(status.responses, records)
                .with_description(format!("{host} media")));
        };

        let response = self.session.send_command(&command).await?;
        let records = match self.parse(&template, &default, &[&response], &ExtractOptions::new())? {
            Some(rows) => {
                let mut media = IndexMap::new();
                for row in &rows {
                    let record = MediaInfo::from_row(self.hostname(), row)?;
                    media.insert(record.interface.clone(), record);
                }
                Some(media)
            }
            None => None,
        };

        Ok(ResponseGroup::new(vec![response], records)
            .with_description(format!("{} media", self.hostname())))
    }

    /// Transceiver diagnostics keyed by interface name.
    pub async fn get_optics(
        &mut self,
        template: TemplateChoice,
    ) -> Result<ResponseGroup<IndexMap<String, InterfaceOptics>>> {
        let optical = compile(&self.profile.quirks.optical_media)?;
        let mut responses = Vec::new();
        let mut outputs = Vec::new();

        match self.profile.commands.optics.clone() {
            OpticsCommand::Bulk(command) => {
                let response = self.session.send_command(&command).await?;
                outputs.push(response.clone());
                responses.push(response);
            }
            OpticsCommand::PerInterface(prefix) => {
                let media = self.get_media(TemplateChoice::Default).await?;
                responses.extend(media.responses);
                let interfaces: Vec<String> = media
                    .records
                    .unwrap_or_default()
                    .into_values()
                    .filter(|m| m.media_type.as_deref().is_some_and(|t| optical.is_match(t)))
                    .map(|m| m.interface)
                    .collect();
                debug!("[{}] {} optical interface(s)", self.session.host(), interfaces.len());

                for interface in interfaces {
                    let response = self
                        .session
                        .send_command(&format!("{prefix} {interface}"))
                        .await?;
                    outputs.push(response.clone());
                    responses.push(response);
                }
            }
        }

        let default = self.profile.templates.optics.clone();
        let source = self.profile.quirks.optics_alerts;
        let records = if outputs.is_empty() && template != TemplateChoice::Skip {
            Some(IndexMap::new())
        } else {
            let options = ExtractOptions::new().flatten_key("interface");
            match self.parse(&template, &default, &outputs, &options)? {
                Some(rows) => {
                    let mut optics = IndexMap::new();
                    for row in &rows {
                        let record = InterfaceOptics::from_row(self.hostname(), row, source)?;
                        optics.insert(record.interface.clone(), record);
                    }
                    Some(optics)
                }
                None => None,
            }
        };

        Ok(ResponseGroup::new(responses, records)
            .with_description(format!("{} optics", self.hostname())))
    }

    /// LLDP neighbors keyed by local interface.
    ///
    /// When the device reports LLDP as disabled the record map is empty.
    pub async fn get_lldp(
        &mut self,
        template: TemplateChoice,
    ) -> Result<ResponseGroup<IndexMap<String, InterfaceLldp>>> {
        let command = self.profile.commands.lldp.clone();
        let response = self.session.send_command(&command).await?;

        if let Some(marker) = self.profile.quirks.lldp_disabled_marker.as_deref() {
            if compile(marker)?.is_match(&response.result) {
                warn!("[{}] LLDP is not enabled", self.session.host());
                let records = (template != TemplateChoice::Skip).then(IndexMap::new);
                return Ok(ResponseGroup::new(vec![response], records)
                    .with_description(format!("{} LLDP disabled", self.hostname())));
            }
        }

        let mut options = ExtractOptions::new();
        options.split_term = self.profile.quirks.lldp_split_term.clone();
        let default = self.profile.templates.lldp.clone();
        let records = match self.parse(&template, &default, &[&response], &options)? {
            Some(rows) => {
                let mut neighbors = IndexMap::new();
                for row in &rows {
                    let record = InterfaceLldp::from_row(self.hostname(), row)?;
                    neighbors.insert(record.interface.clone(), record);
                }
                Some(neighbors)
            }
            None => None,
        };

        Ok(ResponseGroup::new(vec![response], records)
            .with_description(format!("{} LLDP", self.hostname())))
    }

    /// PoE budget and per-port state.
    pub async fn get_poe_status(
        &mut self,
        template: TemplateChoice,
    ) -> Result<ResponseGroup<PoeStatus>> {
        let command = self.profile.commands.poe.clone();
        let response = self.session.send_command(&command).await?;

        let default = self.profile.templates.poe.clone();
        let records = match self.parse(&template, &default, &[&response], &ExtractOptions::new())? {
            Some(rows) => Some(PoeStatus::from_rows(
                self.hostname(),
                &rows,
                self.profile.quirks.poe_milliwatts,
            )?),
            None => None,
        };

        Ok(ResponseGroup::new(vec![response], records)
            .with_description(format!("{} PoE", self.hostname())))
    }

    /// Run TDR cable tests on copper interfaces.
    ///
    /// `interface_status` is fetched when not supplied. With `only_bad`,
    /// only links negotiated below 1000 Mbps are tested.
    pub async fn get_tdr_data(
        &mut self,
        interface_status: Option<Vec<InterfaceStatus>>,
        only_bad: bool,
        template: TemplateChoice,
    ) -> Result<TdrReport> {
        let mut responses = Vec::new();

        let mut statuses = match interface_status {
            Some(statuses) => statuses,
            None => {
                let group = self.get_interface_status(TemplateChoice::Default).await?;
                responses.extend(group.responses);
                group.records.unwrap_or_default().into_values().collect()
            }
        };

        if self.profile.commands.media.is_some() {
            let media = self.get_media(TemplateChoice::Default).await?;
            responses.extend(media.responses);
            let types: HashMap<String, Option<String>> = media
                .records
                .unwrap_or_default()
                .into_iter()
                .map(|(interface, m)| (interface, m.media_type))
                .collect();
            for status in &mut statuses {
                if let Some(media_type) = types.get(&status.interface) {
                    status.media = media_type.clone();
                }
            }
        }

        let optical = compile(&self.profile.quirks.optical_media)?;
        let targets = select_tdr_targets(&statuses, &optical, only_bad);
        info!(
            "[{}] testing {} of {} interface(s)",
            self.session.host(),
            targets.len(),
            statuses.len()
        );

        let collector = PollingCollector::new(
            self.profile.commands.tdr_start.clone(),
            self.profile.commands.tdr_show.clone(),
            compile(&self.profile.quirks.tdr_in_progress)?,
            self.poll.clone(),
        );
        let outcome = collector.run(&mut self.session, &targets).await?;
        responses.extend(outcome.responses);

        let records = if template == TemplateChoice::Skip {
            None
        } else {
            let default = self.profile.templates.tdr.clone();
            let mut results = IndexMap::new();
            for (interface, output) in &outcome.completed {
                let rows = self
                    .parse(&template, &default, &[output], &ExtractOptions::new())?
                    .unwrap_or_default();
                let record = InterfaceTdr::from_rows(self.hostname(), interface, &rows)?;
                results.insert(interface.clone(), record);
            }
            Some(results)
        };

        Ok(TdrReport {
            group: ResponseGroup::new(responses, records)
                .with_description(format!("{} TDR", self.hostname())),
            incomplete: outcome.incomplete,
        })
    }

    /// Resolve, extract and normalize. `None` when parsing is skipped.
    fn parse<S: AsRef<str>>(
        &self,
        choice: &TemplateChoice,
        default: &str,
        inputs: &[S],
        options: &ExtractOptions,
    ) -> Result<Option<Vec<NormalizedRow>>> {
        let reference = match choice {
            TemplateChoice::Skip => return Ok(None),
            TemplateChoice::Default => default,
            TemplateChoice::Custom(reference) => reference.as_str(),
        };
        let template = self.resolver.resolve(&self.profile.name, reference)?;
        let rows = extract(&self.matcher, &template, inputs, options)?;
        Ok(Some(self.fields.normalize_all(&rows)?))
    }
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| {
        SessionError::InvalidConfig {
            message: format!("invalid vendor pattern '{pattern}': {e}"),
        }
        .into()
    })
}

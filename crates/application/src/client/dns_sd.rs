//! DNS-based service discovery (RFC 6763) on top of [`Client::lookup`].

use super::Client;
use crate::records::collect_records;
use hickory_proto::op::Message;
use hickory_proto::rr::rdata::{A, AAAA, NAPTR, PTR, SRV, TXT};
use hickory_proto::rr::{Name, RecordType};
use resolv_domain::names::fqdn;
use resolv_domain::{
    InstanceName, NaptrRecord, ResolveError, ServiceCatalog, ServiceDiscovery,
    ServiceInstanceInfo,
};
use std::collections::{BTreeMap, BTreeSet};
use std::net::IpAddr;
use tracing::debug;

impl Client {
    /// Browsing domains listed at `b._dns-sd._udp.<domain>`.
    pub async fn service_browser_domains(
        &mut self,
        domain: &str,
    ) -> Result<Vec<String>, ResolveError> {
        self.ptr_targets(&format!("b._dns-sd._udp.{}", domain)).await
    }

    /// The default browsing domain at `db._dns-sd._udp.<domain>`.
    pub async fn default_service_browser_domain(
        &mut self,
        domain: &str,
    ) -> Result<String, ResolveError> {
        let mut targets = self.ptr_targets(&format!("db._dns-sd._udp.{}", domain)).await?;
        if targets.is_empty() {
            return Err(ResolveError::BadData);
        }
        Ok(targets.swap_remove(0))
    }

    /// Legacy browsing domains at `lb._dns-sd._udp.<domain>`.
    pub async fn legacy_service_browser_domains(
        &mut self,
        domain: &str,
    ) -> Result<Vec<String>, ResolveError> {
        self.ptr_targets(&format!("lb._dns-sd._udp.{}", domain)).await
    }

    /// Union of the listed, default and legacy browsing domains, sorted.
    ///
    /// Succeeds if any of the three lookups does; individual failures are
    /// only logged. If all three fail, their errors are returned together.
    pub async fn all_service_browser_domains(
        &mut self,
        domain: &str,
    ) -> Result<Vec<String>, ResolveError> {
        let mut domains = BTreeSet::new();
        let mut errors = Vec::new();

        match self.service_browser_domains(domain).await {
            Ok(names) => domains.extend(names),
            Err(e) => errors.push(e),
        }
        match self.default_service_browser_domain(domain).await {
            Ok(name) => {
                domains.insert(name);
            }
            Err(e) => errors.push(e),
        }
        match self.legacy_service_browser_domains(domain).await {
            Ok(names) => domains.extend(names),
            Err(e) => errors.push(e),
        }

        if domains.is_empty() {
            return Err(ResolveError::Multiple(errors));
        }
        for error in &errors {
            debug!(domain, error = %error, "Browsing domain lookup failed");
        }
        Ok(domains.into_iter().collect())
    }

    /// Service types advertised at `_services._dns-sd._udp.<domain>`.
    pub async fn services(&mut self, domain: &str) -> Result<Vec<String>, ResolveError> {
        self.ptr_targets(&format!("_services._dns-sd._udp.{}", domain))
            .await
    }

    /// Instances of a service, given its service domain (`_ipp._tcp.<domain>`).
    pub async fn service_instances(
        &mut self,
        service_domain: &str,
    ) -> Result<Vec<String>, ResolveError> {
        self.ptr_targets(service_domain).await
    }

    /// SRV, TXT and address records of one service instance.
    ///
    /// Only the SRV lookup is required. Target addresses come from the
    /// additional section when the server included them, otherwise from
    /// separate A/AAAA lookups; a target of `.` is not resolved.
    pub async fn service_instance_info(
        &mut self,
        instance: &str,
    ) -> Result<ServiceInstanceInfo, ResolveError> {
        let response = self.lookup(instance, RecordType::SRV).await?;
        let srv = match collect_records::<SRV>(response.answers()).first() {
            Some(rr) => rr.data.clone(),
            None => return Err(ResolveError::BadData),
        };

        let mut info = srv_info(instance, &srv);
        if !srv.target().is_root() {
            info.addrs = self.target_addrs(srv.target(), &response).await;
        }

        match self.txt_values(instance).await {
            Ok(txt) => info.txt = txt,
            Err(e) => debug!(instance, error = %e, "TXT lookup failed"),
        }
        Ok(info)
    }

    /// Walks the DNS-SD tree of `domain`: browsing domains (or `domain`
    /// itself when it publishes none), their services, the instances of each
    /// service and the instance details. Lookups that fail are skipped.
    pub async fn discover(&mut self, domain: &str) -> ServiceDiscovery {
        let browse_domains = match self.all_service_browser_domains(domain).await {
            Ok(domains) => domains,
            Err(e) => {
                debug!(domain, error = %e, "No browsing domains");
                vec![fqdn(domain)]
            }
        };

        let mut service_domains = BTreeSet::new();
        for browser in &browse_domains {
            match self.services(browser).await {
                Ok(services) => service_domains.extend(services),
                Err(e) => debug!(browser = %browser, error = %e, "Service enumeration failed"),
            }
        }

        let mut services: BTreeMap<String, Vec<ServiceInstanceInfo>> = BTreeMap::new();
        for service_domain in service_domains {
            let instances = match self.service_instances(&service_domain).await {
                Ok(instances) => instances,
                Err(e) => {
                    debug!(service = %service_domain, error = %e, "Instance enumeration failed");
                    continue;
                }
            };
            let key = InstanceName::parse(&service_domain)
                .service
                .unwrap_or_else(|| service_domain.clone());

            for instance in instances {
                match self.service_instance_info(&instance).await {
                    Ok(info) => services.entry(key.clone()).or_default().push(info),
                    Err(e) => debug!(instance = %instance, error = %e, "Instance lookup failed"),
                }
            }
        }

        ServiceDiscovery {
            browse_domains,
            services,
        }
    }

    /// Looks up `<service>.<domain>` SRV records for every catalog entry.
    /// Services without an SRV answer are left out of the result.
    pub async fn probe_services(
        &mut self,
        domain: &str,
        catalog: &ServiceCatalog,
    ) -> BTreeMap<String, Vec<ServiceInstanceInfo>> {
        let mut found = BTreeMap::new();

        for service in catalog.iter() {
            let name = format!("{}.{}", service, domain);
            let response = match self.lookup(&name, RecordType::SRV).await {
                Ok(response) => response,
                Err(e) => {
                    debug!(service = %service, error = %e, "SRV probe failed");
                    continue;
                }
            };

            let records: Vec<SRV> = collect_records::<SRV>(response.answers())
                .iter()
                .map(|rr| rr.data.clone())
                .collect();
            let mut infos = Vec::with_capacity(records.len());
            for srv in &records {
                let mut info = srv_info(&name, srv);
                if !srv.target().is_root() {
                    info.addrs = self.target_addrs(srv.target(), &response).await;
                }
                infos.push(info);
            }
            if !infos.is_empty() {
                found.insert(service.to_string(), infos);
            }
        }

        found
    }

    /// Enumerates instances of every catalog service at `<service>.<domain>`
    /// and looks each one up. Results are keyed by catalog entry; services
    /// and instances whose lookups fail are left out.
    pub async fn probe_service_instances(
        &mut self,
        domain: &str,
        catalog: &ServiceCatalog,
    ) -> BTreeMap<String, Vec<ServiceInstanceInfo>> {
        let mut found = BTreeMap::new();

        for service in catalog.iter() {
            let service_domain = format!("{}.{}", service, domain);
            let instances = match self.service_instances(&service_domain).await {
                Ok(instances) => instances,
                Err(e) => {
                    debug!(service = %service, error = %e, "PTR probe failed");
                    continue;
                }
            };

            let mut infos = Vec::with_capacity(instances.len());
            for instance in instances {
                match self.service_instance_info(&instance).await {
                    Ok(info) => infos.push(info),
                    Err(e) => debug!(instance = %instance, error = %e, "Instance lookup failed"),
                }
            }
            if !infos.is_empty() {
                found.insert(service.to_string(), infos);
            }
        }

        found
    }

    /// NAPTR records at `domain`, in answer order.
    pub async fn naptr_records(&mut self, domain: &str) -> Result<Vec<NaptrRecord>, ResolveError> {
        let response = self.lookup(domain, RecordType::NAPTR).await?;
        Ok(collect_records::<NAPTR>(response.answers())
            .iter()
            .map(|rr| naptr_record(rr.data))
            .collect())
    }

    async fn ptr_targets(&mut self, name: &str) -> Result<Vec<String>, ResolveError> {
        let response = self.lookup(name, RecordType::PTR).await?;
        Ok(collect_records::<PTR>(response.answers())
            .iter()
            .map(|rr| rr.data.0.to_utf8())
            .collect())
    }

    async fn txt_values(&mut self, name: &str) -> Result<Vec<Vec<String>>, ResolveError> {
        let response = self.lookup(name, RecordType::TXT).await?;
        Ok(collect_records::<TXT>(response.answers())
            .iter()
            .map(|rr| {
                rr.data
                    .txt_data()
                    .iter()
                    .map(|s| String::from_utf8_lossy(s).into_owned())
                    .collect()
            })
            .collect())
    }

    /// Addresses of an SRV target, preferring the additional section of the
    /// SRV response. A failed A/AAAA lookup yields no addresses.
    async fn target_addrs(&mut self, target: &Name, response: &Message) -> Vec<IpAddr> {
        let additional = additional_addrs(response, target);
        if !additional.is_empty() {
            return additional;
        }
        let target = target.to_utf8();
        match self.ips(&target).await {
            Ok(addrs) => addrs,
            Err(e) => {
                debug!(target = %target, error = %e, "SRV target has no addresses");
                Vec::new()
            }
        }
    }
}

fn srv_info(name: &str, srv: &SRV) -> ServiceInstanceInfo {
    ServiceInstanceInfo {
        name: name.to_string(),
        priority: srv.priority(),
        weight: srv.weight(),
        port: srv.port(),
        target: srv.target().to_utf8(),
        txt: Vec::new(),
        addrs: Vec::new(),
    }
}

fn naptr_record(naptr: &NAPTR) -> NaptrRecord {
    let text = |bytes: &[u8]| String::from_utf8_lossy(bytes).into_owned();
    NaptrRecord {
        order: naptr.order(),
        preference: naptr.preference(),
        flags: text(naptr.flags()),
        services: text(naptr.services()),
        regexp: text(naptr.regexp()),
        replacement: naptr.replacement().to_utf8(),
    }
}

fn additional_addrs(response: &Message, target: &Name) -> Vec<IpAddr> {
    let additionals = response.additionals();
    let v4 = collect_records::<A>(additionals)
        .into_iter()
        .filter(|rr| rr.name == target)
        .map(|rr| IpAddr::V4(rr.data.0));
    let v6 = collect_records::<AAAA>(additionals)
        .into_iter()
        .filter(|rr| rr.name == target)
        .map(|rr| IpAddr::V6(rr.data.0));
    v4.chain(v6).collect()
}

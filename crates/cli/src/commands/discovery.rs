use resolv_application::Client;
use resolv_domain::{ResolveError, ServiceCatalog};

pub async fn print_services(client: &mut Client, qname: &str) -> Result<(), ResolveError> {
    let discovery = client.discover(qname).await;

    println!("Service Browser Domains:");
    for domain in &discovery.browse_domains {
        println!("\t{}", domain);
    }

    if discovery.is_empty() {
        return Ok(());
    }
    println!("Services:");
    for (service, instances) in &discovery.services {
        println!("\t{}", service);
        for info in instances {
            println!("\t\t{}", info.name);
            println!("\t\t\t{}", info);
        }
    }
    Ok(())
}

pub async fn print_probe(
    client: &mut Client,
    qname: &str,
    catalog: &ServiceCatalog,
) -> Result<(), ResolveError> {
    let found = client.probe_services(qname, catalog).await;
    for (service, instances) in &found {
        println!("{}", service);
        for info in instances {
            println!("\t{}", info);
        }
    }
    Ok(())
}

pub async fn print_ptr_probe(
    client: &mut Client,
    qname: &str,
    catalog: &ServiceCatalog,
) -> Result<(), ResolveError> {
    let found = client.probe_service_instances(qname, catalog).await;
    for (service, instances) in &found {
        println!("{}", service);
        for info in instances {
            println!("\t{}", info.name);
            println!("\t\t{}", info);
        }
    }
    Ok(())
}

pub async fn print_naptr(client: &mut Client, qname: &str) -> Result<(), ResolveError> {
    for record in client.naptr_records(qname).await? {
        println!("{}", record);
    }
    Ok(())
}

use hickory_proto::rr::RecordType;
use resolv_application::Client;
use resolv_domain::ResolveError;

pub async fn print_lookup(
    client: &mut Client,
    qname: &str,
    qtype: RecordType,
) -> Result<(), ResolveError> {
    let response = client.lookup(qname, qtype).await?;
    println!("{}", response);
    Ok(())
}

pub async fn print_ips(client: &mut Client, qname: &str) -> Result<(), ResolveError> {
    for addr in client.ips(qname).await? {
        println!("{}", addr);
    }
    Ok(())
}

pub async fn print_nameservers(client: &mut Client, qname: &str) -> Result<(), ResolveError> {
    for nameserver in client.nameservers(qname).await? {
        let addrs: Vec<String> = nameserver.addrs.iter().map(ToString::to_string).collect();
        println!("{}: {}", nameserver.name, addrs.join(" "));
    }
    Ok(())
}

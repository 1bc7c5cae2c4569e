// /proc readers for per-process I/O counters, open files and sockets (Linux).

use std::collections::{BTreeMap, HashMap};
use std::io;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::path::Path;

use crate::models::{Connection, Endpoint};

/// Fields of /proc/<pid>/stat the inspector reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ProcStat {
    pub(crate) num_threads: usize,
}

/// Reads /proc/<pid>/stat once. Fails with the raw io error so the caller can
/// tell "gone" from "denied".
pub(super) fn probe(pid: u32) -> io::Result<ProcStat> {
    let text = std::fs::read_to_string(format!("/proc/{pid}/stat"))?;
    parse_stat(&text).ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("malformed /proc/{pid}/stat"),
        )
    })
}

/// The command name may contain spaces and parentheses, so fields are
/// counted from the last `)`. `num_threads` is field 20 overall.
pub(crate) fn parse_stat(text: &str) -> Option<ProcStat> {
    let (_, rest) = text.rsplit_once(')')?;
    let num_threads = rest.split_whitespace().nth(17)?.parse().ok()?;
    Some(ProcStat { num_threads })
}

pub(super) fn io_counters(pid: u32) -> io::Result<BTreeMap<String, u64>> {
    let text = std::fs::read_to_string(format!("/proc/{pid}/io"))?;
    Ok(parse_io(&text))
}

/// Parses `key: value` lines of /proc/<pid>/io.
pub(crate) fn parse_io(text: &str) -> BTreeMap<String, u64> {
    text.lines()
        .filter_map(|line| {
            let (key, value) = line.split_once(':')?;
            Some((key.trim().to_string(), value.trim().parse().ok()?))
        })
        .collect()
}

/// (fd, link target) for every descriptor of the process, sorted by fd.
fn fd_links(pid: u32) -> io::Result<Vec<(i32, String)>> {
    let mut links = Vec::new();
    for entry in std::fs::read_dir(format!("/proc/{pid}/fd"))? {
        let entry = entry?;
        let Some(fd) = entry.file_name().to_str().and_then(|s| s.parse().ok()) else {
            continue;
        };
        // descriptors can close between readdir and readlink
        if let Ok(target) = std::fs::read_link(entry.path()) {
            links.push((fd, target.to_string_lossy().into_owned()));
        }
    }
    links.sort_by_key(|(fd, _)| *fd);
    Ok(links)
}

/// Paths of regular files the process holds open.
pub(super) fn open_files(pid: u32) -> io::Result<Vec<String>> {
    Ok(fd_links(pid)?
        .into_iter()
        .map(|(_, target)| target)
        .filter(|target| target.starts_with('/') && Path::new(target).is_file())
        .collect())
}

/// Inode of a `socket:[12345]` link target.
pub(crate) fn socket_inode(target: &str) -> Option<u64> {
    target
        .strip_prefix("socket:[")?
        .strip_suffix(']')?
        .parse()
        .ok()
}

const SOCKET_TABLES: [(&str, &str, &str); 4] = [
    ("tcp", "AF_INET", "SOCK_STREAM"),
    ("tcp6", "AF_INET6", "SOCK_STREAM"),
    ("udp", "AF_INET", "SOCK_DGRAM"),
    ("udp6", "AF_INET6", "SOCK_DGRAM"),
];

/// Internet sockets owned by the process, matched by inode against its network namespace tables.
pub(super) fn connections(pid: u32) -> io::Result<Vec<Connection>> {
    let inodes: HashMap<u64, i32> = fd_links(pid)?
        .into_iter()
        .filter_map(|(fd, target)| socket_inode(&target).map(|inode| (inode, fd)))
        .collect();
    if inodes.is_empty() {
        return Ok(Vec::new());
    }

    let mut conns = Vec::new();
    for (table, family, kind) in SOCKET_TABLES {
        let Ok(text) = std::fs::read_to_string(format!("/proc/{pid}/net/{table}")) else {
            continue;
        };
        for (inode, mut conn) in parse_socket_table(&text, family, kind) {
            if let Some(&fd) = inodes.get(&inode) {
                conn.fd = Some(fd);
                conns.push(conn);
            }
        }
    }
    Ok(conns)
}

/// Parses /proc/net/{tcp,tcp6,udp,udp6} into (inode, connection) pairs.
pub(crate) fn parse_socket_table(
    text: &str,
    family: &str,
    kind: &str,
) -> Vec<(u64, Connection)> {
    text.lines()
        .skip(1)
        .filter_map(|line| {
            let fields: Vec<&str> = line.split_whitespace().collect();
            // sl local rem st tx:rx tr:tm retrnsmt uid timeout inode
            let laddr = parse_endpoint(fields.get(1)?)?;
            let raddr = parse_endpoint(fields.get(2)?)?;
            let state = u8::from_str_radix(fields.get(3)?, 16).ok()?;
            let inode: u64 = fields.get(9)?.parse().ok()?;
            let status = if kind == "SOCK_STREAM" {
                tcp_state(state)
            } else {
                "NONE"
            };
            let raddr = (raddr.port != 0).then_some(raddr);
            Some((
                inode,
                Connection {
                    fd: None,
                    family: family.to_string(),
                    kind: kind.to_string(),
                    laddr,
                    raddr,
                    status: status.to_string(),
                },
            ))
        })
        .collect()
}

/// Decodes `0100007F:0035` (IPv4) or the 32-hex-digit IPv6 form. The kernel
/// prints each 32-bit word in host byte order.
pub(crate) fn parse_endpoint(s: &str) -> Option<Endpoint> {
    let (addr, port) = s.split_once(':')?;
    let port = u16::from_str_radix(port, 16).ok()?;
    let ip = match addr.len() {
        8 => {
            let word = u32::from_str_radix(addr, 16).ok()?;
            Ipv4Addr::from(word.to_le_bytes()).to_string()
        }
        32 => {
            let mut octets = [0u8; 16];
            for (i, chunk) in octets.chunks_mut(4).enumerate() {
                let word = u32::from_str_radix(addr.get(i * 8..i * 8 + 8)?, 16).ok()?;
                chunk.copy_from_slice(&word.to_le_bytes());
            }
            Ipv6Addr::from(octets).to_string()
        }
        _ => return None,
    };
    Some(Endpoint { ip, port })
}

fn tcp_state(code: u8) -> &'static str {
    match code {
        0x01 => "ESTABLISHED",
        0x02 => "SYN_SENT",
        0x03 => "SYN_RECV",
        0x04 => "FIN_WAIT1",
        0x05 => "FIN_WAIT2",
        0x06 => "TIME_WAIT",
        0x07 => "CLOSE",
        0x08 => "CLOSE_WAIT",
        0x09 => "LAST_ACK",
        0x0A => "LISTEN",
        0x0B => "CLOSING",
        _ => "NONE",
    }
}

// Interactive front end: start a node on the given port, then drive it from a menu.
use clap::Parser;
use log::error;
use relay_node::{Config, MenuChoice, Node, Opt};
use std::io::{self, BufRead, Lines, Write};
use std::process;

fn main() {
    // Info by default, RUST_LOG wins when set
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let opt = Opt::parse();

    if let Err(e) = run(opt) {
        error!("Error: {e}");
        process::exit(1);
    }
}

fn run(opt: Opt) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = Config::new(opt.port);
    if let Some(host) = opt.host {
        config = config.with_host(host);
    }
    if let Some(dir) = opt.ledger_dir {
        config = config.with_ledger_dir(dir);
    }

    let node = Node::new(config);
    // Listen/Load failures end the process here
    node.start()?;

    let mut lines = io::stdin().lock().lines();
    loop {
        println!();
        for choice in MenuChoice::ALL {
            println!("{choice}");
        }

        let Some(input) = prompt(&mut lines, "Enter your choice: ")? else {
            break;
        };
        let choice = match input.parse::<MenuChoice>() {
            Ok(choice) => choice,
            Err(msg) => {
                println!("{msg}");
                continue;
            }
        };

        match choice {
            MenuChoice::ConnectPeer => {
                let Some(host) = prompt(&mut lines, "Enter peer host to connect: ")? else {
                    break;
                };
                let Some(port) = prompt(&mut lines, "Enter peer port to connect: ")? else {
                    break;
                };
                let port = match port.parse::<u16>() {
                    Ok(port) => port,
                    Err(e) => {
                        println!("Invalid port {port}: {e}");
                        continue;
                    }
                };
                match node.connect_to_peer(&host, port) {
                    Ok(_) => println!("Connected to peer {host}:{port}"),
                    Err(e) => println!("Error connecting to peer: {e}"),
                }
            }
            MenuChoice::CreateTransaction => {
                let Some(recipient) = prompt(&mut lines, "Enter recipient wallet address: ")?
                else {
                    break;
                };
                let Some(amount) = prompt(&mut lines, "Enter amount: ")? else {
                    break;
                };
                let amount = match amount.parse::<f64>() {
                    Ok(amount) if amount.is_finite() => amount,
                    _ => {
                        println!("Invalid amount: {amount}");
                        continue;
                    }
                };
                match node.create_transaction(&recipient, amount) {
                    Ok(tx) => println!("Transaction created: {tx}"),
                    Err(e) => println!("Error creating transaction: {e}"),
                }
            }
            MenuChoice::ViewTransactions => {
                println!("All transactions:");
                for tx in node.transactions()? {
                    println!("{tx}");
                }
            }
            MenuChoice::ViewWalletAddress => {
                println!("Your wallet address is: {}", node.wallet_address());
            }
            MenuChoice::ViewPeers => {
                let peers = node.peers()?;
                println!("Connected peers: {}", peers.len());
                for peer in peers {
                    let addr = peer
                        .remote_addr
                        .map(|a| a.to_string())
                        .unwrap_or_else(|| "unknown".to_string());
                    println!("{addr} ({:?})", peer.direction);
                }
            }
            MenuChoice::Exit => break,
        }
    }

    println!("Exiting...");
    Ok(())
}

/// Print `label` and read one trimmed line; `None` at end of input
fn prompt<B: BufRead>(lines: &mut Lines<B>, label: &str) -> io::Result<Option<String>> {
    print!("{label}");
    io::stdout().flush()?;
    lines
        .next()
        .transpose()
        .map(|line| line.map(|l| l.trim().to_string()))
}

use clap::Parser;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Parser)]
#[command(name = "relay-node", about = "Peer-to-peer transaction relay node")]
pub struct Opt {
    // The ledger file is named after this port, so 0 is refused
    #[arg(help = "Port to listen on", value_parser = clap::value_parser!(u16).range(1..))]
    pub port: u16,
    #[arg(long = "host", help = "Interface to bind (default 0.0.0.0, or NODE_HOST)")]
    pub host: Option<String>,
    #[arg(
        long = "ledger-dir",
        help = "Directory for transactions_<port>.json (default: working directory, or LEDGER_DIR)"
    )]
    pub ledger_dir: Option<PathBuf>,
}

/// One entry of the interactive menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    ConnectPeer,
    CreateTransaction,
    ViewTransactions,
    ViewWalletAddress,
    Exit,
    ViewPeers,
}

impl MenuChoice {
    pub const ALL: [MenuChoice; 6] = [
        MenuChoice::ConnectPeer,
        MenuChoice::CreateTransaction,
        MenuChoice::ViewTransactions,
        MenuChoice::ViewWalletAddress,
        MenuChoice::Exit,
        MenuChoice::ViewPeers,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            MenuChoice::ConnectPeer => "1",
            MenuChoice::CreateTransaction => "2",
            MenuChoice::ViewTransactions => "3",
            MenuChoice::ViewWalletAddress => "4",
            MenuChoice::Exit => "5",
            MenuChoice::ViewPeers => "6",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MenuChoice::ConnectPeer => "Connect to a peer",
            MenuChoice::CreateTransaction => "Create a transaction",
            MenuChoice::ViewTransactions => "View all transactions",
            MenuChoice::ViewWalletAddress => "View my wallet address",
            MenuChoice::Exit => "Exit",
            MenuChoice::ViewPeers => "View connected peers",
        }
    }
}

impl FromStr for MenuChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        MenuChoice::ALL
            .iter()
            .find(|choice| choice.key() == s)
            .copied()
            .ok_or_else(|| "Invalid choice. Please try again.".to_string())
    }
}

impl std::fmt::Display for MenuChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}. {}", self.key(), self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_keys() {
        assert_eq!("1".parse::<MenuChoice>(), Ok(MenuChoice::ConnectPeer));
        assert_eq!(" 5\n".parse::<MenuChoice>(), Ok(MenuChoice::Exit));
        assert!("7".parse::<MenuChoice>().is_err());
        assert!("".parse::<MenuChoice>().is_err());
    }

    #[test]
    fn test_menu_display() {
        assert_eq!(
            MenuChoice::CreateTransaction.to_string(),
            "2. Create a transaction"
        );
    }

    #[test]
    fn test_parse_port_argument() {
        let opt = Opt::try_parse_from(["relay-node", "5000"]).unwrap();
        assert_eq!(opt.port, 5000);
        assert!(opt.host.is_none());

        assert!(Opt::try_parse_from(["relay-node"]).is_err());
        assert!(Opt::try_parse_from(["relay-node", "not-a-port"]).is_err());
        assert!(Opt::try_parse_from(["relay-node", "0"]).is_err());
    }
}

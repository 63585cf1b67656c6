//! CLI 定义模块：仅负责命令行参数结构体与解析
//! 将 clap 的声明与业务逻辑解耦。

use std::ffi::OsString;

use clap::{error::ErrorKind, CommandFactory, Parser, Subcommand};

/// 含程序名在内允许的最多参数个数
pub(crate) const MAX_ARGS: usize = 4;

/// 顶层 CLI 入口
#[derive(Parser, Debug)]
#[command(
    name = "capacitor-xbox",
    about = "为 Web 单页应用生成并同步 UWP / Xbox 原生工程",
    version,
    arg_required_else_help = true
)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Command,
}

/// 子命令定义
#[derive(Subcommand, Debug, PartialEq)]
pub(crate) enum Command {
    /// 下载模板并初始化 Capacitor Xbox 工程
    #[command(short_flag = 'i')]
    Init {
        /// 不询问，直接采用探测到的默认值（也可设置 CAPX_YES=1）
        #[arg(short, long)]
        yes: bool,
        /// 多余的修饰参数，忽略
        #[arg(hide = true, num_args = 0..=2)]
        extra: Vec<String>,
    },
    /// 同步 Web 构建产物与图标/横幅到原生工程
    #[command(short_flag = 's')]
    Sync {
        /// 把 .wasm 改名为 .txt 并更新引用
        #[arg(long)]
        patch_wasm: bool,
        /// 其它修饰参数，忽略
        #[arg(hide = true, num_args = 0..=2)]
        extra: Vec<String>,
    },
    /// 用系统默认程序打开 UWP 解决方案
    #[command(short_flag = 'o')]
    Open {
        /// 多余参数，忽略
        #[arg(hide = true, num_args = 0..=2)]
        extra: Vec<String>,
    },
}

/// 解析命令行；参数总数超过 [`MAX_ARGS`] 时按参数错误处理
pub(crate) fn parse_args<I, T>(args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
    if args.len() > MAX_ARGS {
        return Err(Cli::command().error(
            ErrorKind::TooManyValues,
            format!("参数过多：最多接受 {} 个参数", MAX_ARGS - 1),
        ));
    }
    Cli::try_parse_from(args)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Command, clap::Error> {
        parse_args(std::iter::once("capacitor-xbox").chain(args.iter().copied())).map(|c| c.command)
    }

    #[test]
    fn declaration_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn long_and_short_forms_are_equivalent() {
        assert_eq!(parse(&["init"]).unwrap(), Command::Init { yes: false, extra: vec![] });
        assert_eq!(parse(&["-i", "--yes"]).unwrap(), Command::Init { yes: true, extra: vec![] });
        assert_eq!(parse(&["-s"]).unwrap(), Command::Sync { patch_wasm: false, extra: vec![] });
        assert_eq!(
            parse(&["sync", "--patch-wasm"]).unwrap(),
            Command::Sync { patch_wasm: true, extra: vec![] }
        );
        assert_eq!(parse(&["-o"]).unwrap(), Command::Open { extra: vec![] });
    }

    #[test]
    fn help_is_not_an_error_exit() {
        for args in [&["help"][..], &["-h"][..]] {
            let err = parse(args).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::DisplayHelp);
            assert!(!err.use_stderr());
        }
    }

    #[test]
    fn malformed_invocations_are_rejected() {
        assert!(parse(&[]).unwrap_err().use_stderr());
        assert!(parse(&["deploy"]).unwrap_err().use_stderr());
        assert!(parse(&["open", "extra", "args", "here"]).unwrap_err().use_stderr());
        assert!(parse(&["sync", "--patch-wasm", "a", "b"]).unwrap_err().use_stderr());
        assert!(parse(&["sync", "--patch-everything"]).is_err());
    }

    #[test]
    fn surplus_modifiers_within_limit_are_ignored() {
        assert_eq!(
            parse(&["sync", "foo"]).unwrap(),
            Command::Sync { patch_wasm: false, extra: vec!["foo".into()] }
        );
        assert!(matches!(
            parse(&["sync", "--patch-wasm", "extra"]).unwrap(),
            Command::Sync { patch_wasm: true, .. }
        ));
        assert!(matches!(parse(&["open", "a", "b"]).unwrap(), Command::Open { .. }));
    }
}

//! 交互式命令行：逐行读取问询，直到读到退出指令或输入结束
//!
//! 退出指令按整行原样比较，带空白的 ` q ` 仍被当作一条问询。
//!
//! 每条问询跑完整条流水线后才读取下一行；失败的问询打印错误信息后继续。

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::pipeline::InquiryPipeline;

pub const FAREWELL: &str = "Have a nice day!";

/// 运行交互循环，返回处理过的问询条数
pub async fn run_shell<R, W>(
    pipeline: &InquiryPipeline,
    quit_token: &str,
    prompt: &str,
    reader: R,
    mut writer: W,
) -> std::io::Result<usize>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();
    let mut handled = 0;

    loop {
        writer.write_all(format!("{prompt}\n").as_bytes()).await?;
        writer.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        if line == quit_token {
            break;
        }
        let inquiry = line.trim();
        if inquiry.is_empty() {
            continue;
        }

        handled += 1;
        let output = match pipeline.process(inquiry).await {
            Ok(answer) => answer,
            Err(err) => format!("Unable to fulfill user inquiry: {err}"),
        };
        writer.write_all(format!("{output}\n\n").as_bytes()).await?;
    }

    writer.write_all(format!("{FAREWELL}\n").as_bytes()).await?;
    writer.flush().await?;
    Ok(handled)
}

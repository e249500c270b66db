mod cli;
mod real_git;
